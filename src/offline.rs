//! Offline fallback replies.
//!
//! Used when the remote API cannot be reached. The tables are fixed at build
//! time and checked in order: exact keywords, then names contained in the
//! message, then the crying and laughing heuristics.

/// Exact message → reply.
const KEYWORD_REPLIES: &[(&str, &str)] = &[
    ("크하학", "KHH"),
    ("KHH", "크하학"),
    ("안녕", "안녕하세요!"),
    ("학식", "서버 연결이 안 된다. 나중에 다시 시도해라."),
    ("날씨", "서버 연결이 안 된다. 나중에 다시 시도해라."),
    ("봇", "오프라인 모드로 작동 중이다."),
];

/// Name contained anywhere in the message → reply. First match wins.
const NAME_REPLIES: &[(&str, &str)] = &[
    ("하리", "허리 조심해라"),
    ("김예준", "바보"),
    ("줄리엔", "많이 먹는다"),
    ("요시", "엄요시다"),
];

const CRY_CHARS: [char; 2] = ['ㅠ', 'ㅜ'];
const CRY_REPLY: &str = "왜 우냐";

const LAUGH_CHAR: char = 'ㅋ';
const LAUGH_MIN_LEN: usize = 5;
const LAUGH_REPLY: &str = "뭘 웃어";

/// Pick the offline reply for `message`, or `None` when nothing matches.
///
/// # Examples
///
/// ```
/// use khhbot::offline::offline_reply;
///
/// assert_eq!(offline_reply("크하학"), Some("KHH"));
/// assert_eq!(offline_reply("하리 어디감"), Some("허리 조심해라"));
/// assert_eq!(offline_reply("ㅋㅋ"), None);
/// ```
pub fn offline_reply(message: &str) -> Option<&'static str> {
    if let Some((_, reply)) = KEYWORD_REPLIES.iter().find(|(keyword, _)| *keyword == message) {
        return Some(*reply);
    }

    if let Some((_, reply)) = NAME_REPLIES.iter().find(|(name, _)| message.contains(name)) {
        return Some(*reply);
    }

    if message.contains(&CRY_CHARS[..]) {
        return Some(CRY_REPLY);
    }

    // Length is counted in UTF-16 code units, so an emoji outside the BMP counts twice
    if message.contains(LAUGH_CHAR) && message.encode_utf16().count() > LAUGH_MIN_LEN {
        return Some(LAUGH_REPLY);
    }

    None
}
