//! 数据库模块
//!
//! 提供视频数据的数据库管理功能，包括连接管理、筛选条件编译与数据访问。

pub mod connection;
pub mod predicate;
pub mod schema;
pub mod video_dao;

pub use connection::VideoDbManager;
pub use predicate::Predicate;
pub use video_dao::VideoDao;
