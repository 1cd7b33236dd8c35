//! Module supporting type-level programming
//!
//! Only one pattern from the usual type-level toolbox survives in this crate:
//! sealing. Traits whose set of implementations must stay closed (the device
//! capability trait, the peripheral states) extend [`Sealed`], which downstream
//! crates are not meant to implement.

/// Super trait used to mark traits with an exhaustive set of implementations
pub trait Sealed {}
