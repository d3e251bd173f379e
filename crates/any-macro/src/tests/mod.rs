mod script;
mod support;
