mod concurrency_tests;
mod service_tests;
