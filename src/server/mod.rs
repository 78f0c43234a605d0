// HTTP hosting of the generated site.

pub mod handler;
