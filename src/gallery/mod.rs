//! Gallery loading: listing fetch, dimension probing, and the view state.
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Where entries come from: the public root on disk, or a site's listing endpoint |
//! | [`probe`] | Intrinsic pixel size of one asset, from disk or over HTTP |
//! | [`loader`] | Progressive loader and the [`GalleryView`] state container |

pub mod loader;
pub mod probe;
pub mod source;

pub use loader::{GalleryLoader, GalleryView, LoadSession, LoadStatus, Transition};
pub use probe::{DimensionProbe, FsProbe, HttpProbe, ProbeError};
pub use source::{HttpListing, ListingSource, LoadError, LocalListing};
