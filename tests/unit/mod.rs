/// Unit test target: lifecycle engine and record migration
mod lifecycle_tests;
mod migration_tests;
