pub mod files;
pub mod metadata;
pub mod storage;

pub use files::{
    atomic_write, backup_file, config_file, ensure_data_dir, get_data_dir, init_local_data_dir,
    log_file, meta_file, read_file, schedule_file, trip_file,
};
pub use metadata::{load_metadata, save_metadata, AppMetadata};
pub use storage::{load_schedule, load_trip, persist_schedule, save_trip, seed_trip};
