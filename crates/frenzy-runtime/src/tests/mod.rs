mod lifecycle_test;
