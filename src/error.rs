#[derive(Debug, Fail)]
pub enum RenderError {
    #[fail(display = "buffer dimensions must be non-zero, got {}x{}", _0, _1)]
    InvalidDimensions(u32, u32),
    #[fail(display = "texture must have 1 to 4 channels, got {}", _0)]
    InvalidChannelCount(u32),
    #[fail(display = "buffer of {} bytes does not hold a {}x{} image with {} channels", _0, _1, _2, _3)]
    InvalidBufferSize(usize, u32, u32, u32),
    #[fail(display = "camera forward vector is degenerate or parallel to the world up axis")]
    DegenerateForward,
    #[fail(display = "invalid camera options: {}", _0)]
    InvalidOptions(&'static str),
}

pub type RenderResult<T> = Result<T, RenderError>;
