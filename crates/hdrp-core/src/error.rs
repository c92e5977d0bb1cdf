use thiserror::Error;

#[derive(Error, Debug)]
pub enum HdrpError {
    #[error("invalid pyramid scale factor: {0}")]
    InvalidScaleFactor(usize),

    #[error("unsupported tile size: {0}")]
    InvalidTileSize(usize),

    #[error("pyramid ratio {pyramid_ratio} and tile ratio {tile_ratio} do not yield an integer repeat factor")]
    InvalidRatio {
        pyramid_ratio: usize,
        tile_ratio: usize,
    },

    #[error("upsampled grid {src_h}x{src_w} exceeds target grid {dst_h}x{dst_w}")]
    GridOverflow {
        src_h: usize,
        src_w: usize,
        dst_h: usize,
        dst_w: usize,
    },

    #[error("tile origin ({row}, {col}) outside plane {height}x{width}")]
    TileOutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("plane {height}x{width} too small for tile size {tile_size}")]
    TileGeometryInvalid {
        height: usize,
        width: usize,
        tile_size: usize,
    },

    #[error("prior grid {actual_h}x{actual_w} does not match tile grid {expected_h}x{expected_w}")]
    PriorGridMismatch {
        expected_h: usize,
        expected_w: usize,
        actual_h: usize,
        actual_w: usize,
    },

    #[error("sample ({row}, {col}) outside plane {height}x{width}")]
    SampleOutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("view {view_h}x{view_w} at ({row}, {col}) exits plane {height}x{width}")]
    ViewOutOfRange {
        row: usize,
        col: usize,
        view_h: usize,
        view_w: usize,
        height: usize,
        width: usize,
    },

    #[error("invalid alignment config: {0}")]
    InvalidConfig(String),

    #[error("empty burst")]
    EmptyBurst,

    #[error("reference index {index} out of range (total: {total})")]
    ReferenceOutOfRange { index: usize, total: usize },

    #[error("frame {index} is {got_h}x{got_w}, expected {expected_h}x{expected_w}")]
    FrameSizeMismatch {
        index: usize,
        expected_h: usize,
        expected_w: usize,
        got_h: usize,
        got_w: usize,
    },
}

pub type Result<T> = std::result::Result<T, HdrpError>;
