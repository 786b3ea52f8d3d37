pub mod calendar_utils;
