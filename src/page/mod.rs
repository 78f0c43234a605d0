// Output surfaces of the viewer: the page regions and the diagnostic stream.

pub mod diagnostics;
pub mod output;
