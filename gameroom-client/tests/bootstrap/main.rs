mod utils;

mod cancellation;
mod machine;
