//! Small helpers shared by server and client code.

/// 当前 UTC 时间的毫秒时间戳
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
