use thiserror::Error;

/// Failures of a single weather lookup.
///
/// Every variant renders as a one-line, user-facing description; the
/// dispatcher prefixes it with the operation name and flags the response
/// as an error. Unsupported cities and missing interval data are normal
/// outcomes and are not represented here.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced an HTTP response (connect failure, timeout).
    #[error("天气API请求失败: {0}")]
    UpstreamRequest(String),

    /// The provider answered with a non-2xx status.
    #[error("天气API返回错误: {status} {reason}")]
    UpstreamTransport { status: u16, reason: String },

    /// The body could not be decoded as the provider envelope.
    #[error("天气API返回了无法解析的数据: {0}")]
    UpstreamFormat(String),

    /// Well-formed envelope that is semantically unusable.
    #[error("获取天气数据失败: {0}")]
    UpstreamData(String),
}

impl WeatherError {
    pub fn data(message: impl Into<String>) -> Self {
        Self::UpstreamData(message.into())
    }
}
