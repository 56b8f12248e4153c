#[cfg(feature = "debug")]
#[macro_export]
macro_rules! log_debug {
    ($($rest:tt)*) => {
        if cfg!(feature = "debug") {
            log::debug!($($rest)*)
        }
    };
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! log_debug {
    ($($rest:tt)*) => {
        if cfg!(debug_assertions) {
            println!($($rest)*)
        }
    };
}

#[cfg(feature = "debug")]
#[macro_export]
macro_rules! log_error {
    ($($rest:tt)*) => {
        if cfg!(feature = "debug") {
            log::error!($($rest)*)
        }
    };
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! log_error {
    ($($rest:tt)*) => {
        if cfg!(debug_assertions) {
            println!($($rest)*)
        }
    };
}
