//! Character-level conversions between the scripts an SKK session can emit.

/// Check the full Hiragana block (U+3040..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Convert a hiragana string to katakana.
/// Non-hiragana characters (ー, ASCII, etc.) are passed through unchanged.
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{3041}'..='\u{3096}').contains(&c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{30A1}'..='\u{30F6}').contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Convert hiragana (and full-width kana punctuation) to half-width katakana.
pub fn hiragana_to_hankaku(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match hankaku(c) {
            Some(h) => out.push_str(h),
            None => out.push(c),
        }
    }
    out
}

fn hankaku(c: char) -> Option<&'static str> {
    let h = match c {
        'ぁ' => "ｧ", 'あ' => "ｱ", 'ぃ' => "ｨ", 'い' => "ｲ", 'ぅ' => "ｩ",
        'う' => "ｳ", 'ぇ' => "ｪ", 'え' => "ｴ", 'ぉ' => "ｫ", 'お' => "ｵ",
        'か' => "ｶ", 'が' => "ｶﾞ", 'き' => "ｷ", 'ぎ' => "ｷﾞ", 'く' => "ｸ",
        'ぐ' => "ｸﾞ", 'け' => "ｹ", 'げ' => "ｹﾞ", 'こ' => "ｺ", 'ご' => "ｺﾞ",
        'さ' => "ｻ", 'ざ' => "ｻﾞ", 'し' => "ｼ", 'じ' => "ｼﾞ", 'す' => "ｽ",
        'ず' => "ｽﾞ", 'せ' => "ｾ", 'ぜ' => "ｾﾞ", 'そ' => "ｿ", 'ぞ' => "ｿﾞ",
        'た' => "ﾀ", 'だ' => "ﾀﾞ", 'ち' => "ﾁ", 'ぢ' => "ﾁﾞ", 'っ' => "ｯ",
        'つ' => "ﾂ", 'づ' => "ﾂﾞ", 'て' => "ﾃ", 'で' => "ﾃﾞ", 'と' => "ﾄ",
        'ど' => "ﾄﾞ", 'な' => "ﾅ", 'に' => "ﾆ", 'ぬ' => "ﾇ", 'ね' => "ﾈ",
        'の' => "ﾉ", 'は' => "ﾊ", 'ば' => "ﾊﾞ", 'ぱ' => "ﾊﾟ", 'ひ' => "ﾋ",
        'び' => "ﾋﾞ", 'ぴ' => "ﾋﾟ", 'ふ' => "ﾌ", 'ぶ' => "ﾌﾞ", 'ぷ' => "ﾌﾟ",
        'へ' => "ﾍ", 'べ' => "ﾍﾞ", 'ぺ' => "ﾍﾟ", 'ほ' => "ﾎ", 'ぼ' => "ﾎﾞ",
        'ぽ' => "ﾎﾟ", 'ま' => "ﾏ", 'み' => "ﾐ", 'む' => "ﾑ", 'め' => "ﾒ",
        'も' => "ﾓ", 'ゃ' => "ｬ", 'や' => "ﾔ", 'ゅ' => "ｭ", 'ゆ' => "ﾕ",
        'ょ' => "ｮ", 'よ' => "ﾖ", 'ら' => "ﾗ", 'り' => "ﾘ", 'る' => "ﾙ",
        'れ' => "ﾚ", 'ろ' => "ﾛ", 'ゎ' => "ﾜ", 'わ' => "ﾜ", 'ゐ' => "ｲ",
        'ゑ' => "ｴ", 'を' => "ｦ", 'ん' => "ﾝ", 'ゔ' => "ｳﾞ", 'ー' => "ｰ",
        '、' => "､", '。' => "｡", '「' => "｢", '」' => "｣", '・' => "･",
        _ => return None,
    };
    Some(h)
}

/// Map a printable ASCII character to its full-width form.
pub fn to_zenkaku(c: char) -> char {
    match c {
        '!'..='~' => char::from_u32(c as u32 + 0xFEE0).unwrap_or(c),
        ' ' => '\u{3000}',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiragana_to_katakana() {
        assert_eq!(hiragana_to_katakana("きょうは"), "キョウハ");
        assert_eq!(hiragana_to_katakana("らーめん"), "ラーメン");
        assert_eq!(hiragana_to_katakana(""), "");
        assert_eq!(hiragana_to_katakana("abc"), "abc");
    }

    #[test]
    fn test_katakana_to_hiragana() {
        assert_eq!(katakana_to_hiragana("カタカナ"), "かたかな");
        assert_eq!(katakana_to_hiragana("ラーメン"), "らーめん");
    }

    #[test]
    fn test_hankaku() {
        assert_eq!(hiragana_to_hankaku("がっこう"), "ｶﾞｯｺｳ");
        assert_eq!(hiragana_to_hankaku("ぱん。"), "ﾊﾟﾝ｡");
        assert_eq!(hiragana_to_hankaku("abc"), "abc");
    }

    #[test]
    fn test_zenkaku() {
        assert_eq!(to_zenkaku('a'), 'ａ');
        assert_eq!(to_zenkaku('!'), '！');
        assert_eq!(to_zenkaku(' '), '\u{3000}');
        assert_eq!(to_zenkaku('あ'), 'あ');
    }

    #[test]
    fn test_char_classification() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ア'));
        assert!(!is_katakana('あ'));
    }
}
