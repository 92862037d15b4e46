// Vensys API data models

mod vensys;

pub use vensys::*;
