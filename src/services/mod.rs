pub mod creation;
pub mod db;
pub mod filter;
pub mod listing;
pub mod pagination;
pub mod seed;

pub use creation::create_video;
pub use db::{VideoDao, VideoDbManager};
pub use filter::build_list_query;
pub use listing::list_videos;
pub use seed::seed_from_file;
