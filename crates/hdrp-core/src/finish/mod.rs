pub mod gamma;
pub mod tonemap;

pub use gamma::{srgb_compress, srgb_decompress};
pub use tonemap::{tonemap_plane, FinishConfig, ToneMapped};
