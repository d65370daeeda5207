use mibae_filter::FilterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Filter task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("Unsupported PNG layout: {0}")]
    UnsupportedLayout(String),

    #[error("Image too large: {width}x{height}")]
    TooLarge { width: usize, height: usize },

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_config() {
        let error = AppError::Config("zoom must be at least 1".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: zoom must be at least 1"
        );
    }

    #[test]
    fn test_image_error_too_large() {
        let error = ImageError::TooLarge {
            width: 70000,
            height: 2,
        };
        assert_eq!(error.to_string(), "Image too large: 70000x2");
    }

    #[test]
    fn test_image_error_png_decode() {
        let error = ImageError::PngDecode("bad signature".to_string());
        assert_eq!(error.to_string(), "PNG decode error: bad signature");
    }

    #[test]
    fn test_app_error_from_filter_error() {
        let app_error: AppError = FilterError::UnknownTone("zigzag".to_string()).into();
        match &app_error {
            AppError::Filter(_) => {}
            _ => panic!("Expected Filter variant"),
        }
        assert_eq!(app_error.to_string(), "Filter error: unknown tone: zigzag");
    }

    #[test]
    fn test_app_error_from_image_error() {
        let app_error: AppError = ImageError::PngEncode("writer closed".to_string()).into();
        match app_error {
            AppError::Image(ImageError::PngEncode(_)) => {}
            _ => panic!("Expected Image variant"),
        }
    }
}
