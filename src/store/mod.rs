//! Backing store of packages and translators
/// Translator store trait and default implementation
mod locator;
/// Message packages
mod package;

pub use locator::{
    TranslatorLocator,
    TranslatorStore,
};
pub use package::{
    Package,
    PackageFactory,
    PackageLocator,
    PackageSpec,
};
