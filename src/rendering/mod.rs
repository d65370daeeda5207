pub mod png_io;

pub use png_io::{decode_png, encode_png, encode_png_optimized, flatten, read_png, write_png};
