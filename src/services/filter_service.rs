use crate::error::AppError;
use mibae_filter::{FilterRun, FilteredImage, MibaeFilter, PixelBuffer};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Runs a shared filter on the tokio runtime, one row at a time.
///
/// Each row is computed on the blocking pool and awaited, so the async
/// workers stay free while a row runs. The cancellation flag is checked
/// before every row. A cancelled run still returns the rows it finished.
pub struct FilterService {
    filter: Arc<MibaeFilter>,
}

/// A filter run spawned onto the runtime
pub struct RunHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<Result<FilteredImage, AppError>>,
}

impl RunHandle {
    /// Ask the run to stop after the current row.
    pub fn cancel(&self) {
        // The receiver lives as long as the task, so a send error means
        // the run already finished.
        let _ = self.cancel.send(true);
    }

    /// True once the run has returned.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to finish or stop.
    pub async fn join(self) -> Result<FilteredImage, AppError> {
        self.task
            .await
            .map_err(|e| AppError::Task(e.to_string()))?
    }
}

impl FilterService {
    pub fn new(filter: MibaeFilter) -> Self {
        Self::from_shared(Arc::new(filter))
    }

    pub fn from_shared(filter: Arc<MibaeFilter>) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &Arc<MibaeFilter> {
        &self.filter
    }

    /// A fresh cancellation flag, initially unset.
    pub fn cancellation() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    /// Filter `input`, checking `cancel` between rows.
    pub async fn run(
        &self,
        input: &PixelBuffer,
        cancel: &watch::Receiver<bool>,
    ) -> Result<FilteredImage, AppError> {
        let started = Instant::now();
        let mut run = FilterRun::new(Arc::clone(&self.filter), input)?;
        let rows_total = run.layout().working().1;

        while !run.is_done() {
            let cancelled = *cancel.borrow();
            if cancelled {
                tracing::info!(
                    rows_completed = run.rows_completed(),
                    rows_total,
                    "Filter run cancelled"
                );
                break;
            }
            let (stepped, progress) = tokio::task::spawn_blocking(move || {
                let progress = run.step_row();
                (run, progress)
            })
            .await
            .map_err(|e| AppError::Task(e.to_string()))?;
            run = stepped;
            progress?;
        }

        let image = run.finish();
        if image.is_complete() {
            tracing::info!(
                width = image.width(),
                height = image.height(),
                rows = rows_total,
                cached_tiles = self.filter.pattern_cache().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Filter run complete"
            );
        }
        Ok(image)
    }

    /// Filter `input` to the end.
    pub async fn run_to_end(&self, input: &PixelBuffer) -> Result<FilteredImage, AppError> {
        let (_cancel, flag) = Self::cancellation();
        self.run(input, &flag).await
    }

    /// Spawn a run onto the runtime and return a handle to cancel or await it.
    pub fn spawn(&self, input: PixelBuffer) -> RunHandle {
        let (cancel, flag) = Self::cancellation();
        let service = Self::from_shared(Arc::clone(&self.filter));
        let task = tokio::spawn(async move { service.run(&input, &flag).await });
        RunHandle { cancel, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibae_filter::{PaletteSet, Rgb, Rgba};

    fn gray(width: usize, height: usize, v: u8) -> PixelBuffer {
        PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(v)); width * height], width, height)
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_matches_blocking_apply() {
        let filter = MibaeFilter::new(PaletteSet::sketchbook());
        let input = gray(10, 6, 90);
        let expected = filter.apply(&input).unwrap();

        let service = FilterService::new(filter);
        let image = service.run_to_end(&input).await.unwrap();

        assert!(image.is_complete());
        assert_eq!(image.to_rgba8(), expected.to_rgba8());
    }

    #[tokio::test]
    async fn test_runtime_stays_responsive_during_run() {
        let service = FilterService::new(MibaeFilter::new(PaletteSet::sketchbook()));
        let handle = service.spawn(gray(48, 48, 100));

        let mut ticks = 0usize;
        while !handle.is_finished() {
            ticks += 1;
            tokio::task::yield_now().await;
        }
        let image = handle.join().await.unwrap();

        assert!(image.is_complete());
        // Rows run off the runtime thread, so this task keeps getting polled.
        assert!(ticks > 1, "only {ticks} ticks during a 48-row run");
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let service = FilterService::new(MibaeFilter::new(PaletteSet::sketchbook()));
        let (cancel, flag) = FilterService::cancellation();
        cancel.send(true).unwrap();

        let image = service.run(&gray(4, 4, 10), &flag).await.unwrap();
        assert_eq!(image.rows_completed(), 0);
        assert!(image.buffer().pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[tokio::test]
    async fn test_invalid_filter_fails_fast() {
        let service = FilterService::new(MibaeFilter::new(PaletteSet::sketchbook()).zoom(0));
        assert!(matches!(
            service.run_to_end(&gray(2, 2, 10)).await,
            Err(AppError::Filter(_))
        ));
    }
}
