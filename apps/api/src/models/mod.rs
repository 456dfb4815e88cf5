// Row and record types shared across services.

pub mod logs;
