//! URL query-string codec shared by searchable list screens.
//!
//! Every list screen keeps its pagination/sort/filter state in the URL under
//! its own namespace, so independently paginated lists can live on one page
//! without stepping on each other's keys.


pub mod config;
pub mod decode;
pub mod encode;
pub mod params;
pub mod update;
