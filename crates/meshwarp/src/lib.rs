#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use meshwarp_mesh as mesh;

#[doc(inline)]
pub use meshwarp_transform as transform;
