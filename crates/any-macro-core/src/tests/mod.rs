mod recorder;
mod store;
mod support;
