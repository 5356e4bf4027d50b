// Extraction from a live solrconfig.xml
pub mod generate;

// diff / apply
pub mod reconcile;

// Core admin
pub mod cores;
