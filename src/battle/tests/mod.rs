mod common;
mod test_run_and_switch;
