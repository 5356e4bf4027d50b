//! Visitors scoped to a single `<requestHandler>` element

use super::{ConfigVisitor, Output, VisitorConfig, boxed};

pub const DEFAULTS: &str = "defaults";
pub const APPENDS: &str = "appends";
pub const INVARIANTS: &str = "invariants";
pub const COMPONENTS: &str = "components";
pub const FIRST_COMPONENTS: &str = "first_components";
pub const LAST_COMPONENTS: &str = "last_components";

/// `<lst name="defaults">` parameters
pub fn defaults() -> VisitorConfig {
    VisitorConfig::named("lst", "defaults", DEFAULTS)
}

/// `<lst name="appends">` parameters
pub fn appends() -> VisitorConfig {
    VisitorConfig::named("lst", "appends", APPENDS)
}

/// `<lst name="invariants">` parameters
pub fn invariants() -> VisitorConfig {
    VisitorConfig::named("lst", "invariants", INVARIANTS)
}

/// `<arr name="components">` replacing the default component list
pub fn components() -> VisitorConfig {
    VisitorConfig::named("arr", "components", COMPONENTS).with_output(Output::List)
}

pub fn first_components() -> VisitorConfig {
    VisitorConfig::named("arr", "first-components", FIRST_COMPONENTS).with_output(Output::List)
}

pub fn last_components() -> VisitorConfig {
    VisitorConfig::named("arr", "last-components", LAST_COMPONENTS).with_output(Output::List)
}

/// Every request handler visitor, in output order
pub fn visitors() -> Vec<Box<dyn ConfigVisitor>> {
    boxed(vec![
        defaults(),
        appends(),
        invariants(),
        components(),
        first_components(),
        last_components(),
    ])
}
