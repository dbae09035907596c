mod snapshot;
#[cfg(feature = "serde")]
mod ron;
