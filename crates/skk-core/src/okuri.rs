//! Okuri-ari headword construction.
//!
//! An okuri-ari dictionary headword is the kana stem followed by the
//! romaji consonant of the first okurigana, e.g. `おく` + `る` → `おくr`.

/// Romaji head letter for the first character of an okurigana.
pub fn okuri_head(kana: char) -> Option<char> {
    let c = match kana {
        'あ' | 'ぁ' => 'a',
        'い' | 'ぃ' => 'i',
        'う' | 'ぅ' => 'u',
        'え' | 'ぇ' => 'e',
        'お' | 'ぉ' => 'o',
        'か' | 'き' | 'く' | 'け' | 'こ' => 'k',
        'が' | 'ぎ' | 'ぐ' | 'げ' | 'ご' => 'g',
        'さ' | 'し' | 'す' | 'せ' | 'そ' => 's',
        'ざ' | 'ず' | 'ぜ' | 'ぞ' => 'z',
        'じ' => 'j',
        'た' | 'ち' | 'つ' | 'て' | 'と' | 'っ' => 't',
        'だ' | 'ぢ' | 'づ' | 'で' | 'ど' => 'd',
        'な' | 'に' | 'ぬ' | 'ね' | 'の' => 'n',
        'は' | 'ひ' | 'ふ' | 'へ' | 'ほ' => 'h',
        'ば' | 'び' | 'ぶ' | 'べ' | 'ぼ' => 'b',
        'ぱ' | 'ぴ' | 'ぷ' | 'ぺ' | 'ぽ' => 'p',
        'ま' | 'み' | 'む' | 'め' | 'も' => 'm',
        'や' | 'ゆ' | 'よ' | 'ゃ' | 'ゅ' | 'ょ' => 'y',
        'ら' | 'り' | 'る' | 'れ' | 'ろ' => 'r',
        'わ' | 'を' | 'ゎ' => 'w',
        'ん' => 'n',
        'ゔ' => 'v',
        _ => return None,
    };
    Some(c)
}

/// Build the okuri-ari lookup word. When the okurigana does not start with
/// a kana the stem is returned unchanged.
pub fn okuri_word(stem: &str, okuri: &str) -> String {
    let mut word = stem.to_string();
    if let Some(head) = okuri.chars().next().and_then(okuri_head) {
        word.push(head);
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_okuri_word() {
        assert_eq!(okuri_word("おく", "る"), "おくr");
        assert_eq!(okuri_word("か", "った"), "かt");
        assert_eq!(okuri_word("かんが", "える"), "かんがe");
        assert_eq!(okuri_word("しん", "じる"), "しんj");
    }

    #[test]
    fn non_kana_okuri_keeps_stem() {
        assert_eq!(okuri_word("おく", ""), "おく");
        assert_eq!(okuri_word("おく", "x"), "おく");
    }
}
