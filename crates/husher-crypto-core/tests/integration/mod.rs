mod envelope_flow;
mod suite_defaults;
