pub mod url_validator;

use chrono::{DateTime, Utc};

/// 短码字母表：小写 base-36
const SHORT_CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 短码最大长度（校验用，生成长度由配置决定）
pub const MAX_SHORT_CODE_LENGTH: usize = 64;

/// 生成随机短码（小写字母 + 数字）
pub fn generate_short_code(length: usize) -> String {
    std::iter::repeat_with(|| {
        SHORT_CODE_ALPHABET[rand::random_range(0..SHORT_CODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 检查短码格式：1..=64 个 `[A-Za-z0-9_-]`
///
/// 不合法的短码不会触发存储查询。
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Object path for an uploaded thumbnail: `<prefix>/<unix_millis>_<suffix>.<ext>`
///
/// The millisecond timestamp plus a random suffix keeps concurrent uploads of
/// files with the same name apart.
pub fn thumbnail_object_path(prefix: &str, file_name: &str, now: DateTime<Utc>) -> String {
    let file = format!(
        "{}_{}.{}",
        now.timestamp_millis(),
        generate_short_code(6),
        file_extension(file_name)
    );

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file
    } else {
        format!("{}/{}", prefix, file)
    }
}

/// 取文件扩展名（小写），不合法时回退为 `img`
fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 10 && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "img".to_string())
}

/// `<origin>/short/<code>`，origin 末尾的 `/` 会被去掉
pub fn build_short_url(public_origin: &str, code: &str) -> String {
    format!("{}/short/{}", public_origin.trim_end_matches('/'), code)
}
