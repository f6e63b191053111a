/// 文本工具
///
/// 字数统计规则：按空白字符切分后的词数

/// 统计一句话的词数
pub fn word_count(sentence: &str) -> usize {
    sentence.split_whitespace().count()
}

/// 统计一组句子的总词数
pub fn word_count_of<S: AsRef<str>>(sentences: &[S]) -> usize {
    sentences.iter().map(|s| word_count(s.as_ref())).sum()
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("one two  three"), 3);
        assert_eq!(word_count("  tab\tseparated\nnew line  "), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_word_count_counts_punctuation_as_part_of_token() {
        // 两侧有空格的标点单独算一个词
        assert_eq!(word_count("claims - unverified, (so far)."), 5);
    }

    #[test]
    fn test_word_count_of_sums_sentences() {
        let sentences = vec!["a b c".to_string(), "d e".to_string(), String::new()];
        assert_eq!(word_count_of(&sentences), 5);
        assert_eq!(word_count_of::<&str>(&[]), 0);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefgh", 3), "abc...");
        assert_eq!(truncate_text("报告内容很长", 2), "报告...");
    }
}
