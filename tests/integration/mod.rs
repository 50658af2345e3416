mod helpers;

mod test_header;
mod test_init;
mod test_release;
mod test_version;
