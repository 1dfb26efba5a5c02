//! @ai:module:intent Select the single most likely final code block from free-form LLM output
//! @ai:module:layer application
//! @ai:module:public_api CodeBlockSelector, CodeBlockSelectorTrait, Candidate
//! @ai:module:stateless true

use regex::Regex;

/// Words in prose that mark the following block as the one the author prefers.
const PREFERENCE_KEYWORDS: [&str; 11] = [
    "correct",
    "revised",
    "updated",
    "optimized",
    "refactored",
    "improved",
    "enhanced",
    "streamlined",
    "simplified",
    "simpler",
    "simplification",
];

/// @ai:intent A candidate code fragment with its byte span in the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Start of the whole block (fence included) in the source text
    pub start: usize,
    /// End of the whole block (fence included) in the source text
    pub end: usize,
    pub content: String,
}

/// @ai:intent Trait for code block selection
pub trait CodeBlockSelectorTrait: Send + Sync {
    /// @ai:intent Pick the best candidate block; never fails, may return ""
    fn select(&self, text: &str) -> String;

    /// @ai:intent All candidate blocks in text order
    fn candidates(&self, text: &str) -> Vec<Candidate>;
}

/// @ai:intent Extracts the preferred fenced block, falling back to a plain-text statement scan
pub struct CodeBlockSelector {
    /// ```lang\n ... ``` with an optional tag on the opening fence
    fence_regex: Regex,
    keyword_regex: Regex,
    /// Line-start statement openers used when no fence exists
    opener_regex: Regex,
}

impl CodeBlockSelector {
    /// @ai:intent Create a new selector
    /// @ai:effects pure
    pub fn new() -> Self {
        let keywords = PREFERENCE_KEYWORDS.join("|");

        Self {
            fence_regex: Regex::new(r"```(?:[\w+#.\-]*[ \t]*\r?\n)?([\s\S]*?)```")
                .expect("fence regex is valid"),
            keyword_regex: Regex::new(&format!(r"(?i)\b(?:{keywords})"))
                .expect("keyword regex is valid"),
            opener_regex: Regex::new(
                r"^(?:def\s+\w+\s*\(.*\)\s*(?:->.*)?:|class\s+\w+|for\s+.+\s+in\s+.+:|while\s+.+:|if\s+.+:|elif\s+.+:|else\s*:|try\s*:|except\b.*:|finally\s*:|with\s+.+:|return\b|function\s+\w+\s*\(|fn\s+\w+)",
            )
            .expect("opener regex is valid"),
        }
    }

    /// @ai:intent Select from an optional text; absent text yields ""
    /// @ai:effects pure
    pub fn select_optional(&self, text: Option<&str>) -> String {
        text.map(|t| self.select(t)).unwrap_or_default()
    }

    /// @ai:intent Collect fenced blocks in text order
    /// @ai:effects pure
    fn fenced_blocks(&self, text: &str) -> Vec<Candidate> {
        self.fence_regex
            .captures_iter(text)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                let body = cap.get(1).map(|m| m.as_str()).unwrap_or("");

                Some(Candidate {
                    start: whole.start(),
                    end: whole.end(),
                    content: body.to_string(),
                })
            })
            .collect()
    }

    /// @ai:intent Collect maximal runs of code-looking lines that begin at a statement opener
    /// @ai:effects pure
    fn plain_blocks(&self, text: &str) -> Vec<Candidate> {
        let lines = split_lines_with_offsets(text);
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let (offset, line) = lines[i];

            if !self.opener_regex.is_match(line.trim_start()) {
                i += 1;
                continue;
            }

            let base_indent = indentation(line);
            let mut last_code_line = i;
            let mut j = i + 1;

            while j < lines.len() {
                let next = lines[j].1;

                if next.trim().is_empty() {
                    j += 1;
                    continue;
                }

                let indent = indentation(next);
                let continues = indent > base_indent
                    || (indent == base_indent && self.is_code_like(next.trim()));

                if !continues {
                    break;
                }

                last_code_line = j;
                j += 1;
            }

            let (end_offset, end_line) = lines[last_code_line];
            let end = end_offset + end_line.len();

            blocks.push(Candidate {
                start: offset,
                end,
                content: text[offset..end].to_string(),
            });

            i = last_code_line + 1;
        }

        blocks
    }

    /// @ai:intent Whether a same-indentation line still belongs to the current run
    /// @ai:effects pure
    fn is_code_like(&self, trimmed: &str) -> bool {
        self.opener_regex.is_match(trimmed)
            || trimmed.starts_with('}')
            || trimmed.ends_with(';')
            || trimmed.ends_with('{')
    }

    /// @ai:intent Keyword occurrences outside of candidate blocks, as end offsets
    /// @ai:effects pure
    fn keyword_ends(&self, text: &str, candidates: &[Candidate]) -> Vec<usize> {
        self.keyword_regex
            .find_iter(text)
            .filter(|m| {
                !candidates
                    .iter()
                    .any(|c| m.start() >= c.start && m.start() < c.end)
            })
            .map(|m| m.end())
            .collect()
    }
}

impl Default for CodeBlockSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBlockSelectorTrait for CodeBlockSelector {
    /// @ai:intent Pick the block following the first preference keyword, else the first block
    /// @ai:post result is one candidate verbatim (trimmed) or ""
    /// @ai:effects pure
    fn select(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let candidates = self.candidates(text);

        if candidates.is_empty() {
            return String::new();
        }

        for keyword_end in self.keyword_ends(text, &candidates) {
            if let Some(block) = candidates.iter().find(|c| c.start > keyword_end) {
                return block.content.trim().to_string();
            }
        }

        candidates[0].content.trim().to_string()
    }

    /// @ai:intent Fenced blocks when any exist, otherwise plain-text statement runs
    /// @ai:effects pure
    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let fenced = self.fenced_blocks(text);

        if !fenced.is_empty() {
            return fenced;
        }

        self.plain_blocks(text)
    }
}

/// @ai:intent Split text into lines (terminators excluded) with their byte offsets
/// @ai:effects pure
fn split_lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for raw in text.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        lines.push((offset, line));
        offset += raw.len();
    }

    lines
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_fenced_block_is_returned_verbatim() {
        let selector = CodeBlockSelector::new();
        let text = "```python\ndef add(a, b):\n    return a + b\n```";

        assert_eq!(selector.select(text), "def add(a, b):\n    return a + b");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let selector = CodeBlockSelector::new();

        assert_eq!(selector.select(""), "");
        assert_eq!(selector.select("   \n\t "), "");
        assert_eq!(selector.select_optional(None), "");
    }

    #[test]
    fn test_keyword_selects_following_block() {
        let selector = CodeBlockSelector::new();
        let text = r#"
Here is a first attempt:

```python
def add(a, b):
    return a - b
```

Some discussion of why that is wrong.

```python
def add(a, b):
    return b - a
```

Here is the revised version:

```python
def add(a, b):
    return a + b
```

And a usage example:

```python
print(add(1, 2))
```
"#;

        assert_eq!(selector.select(text), "def add(a, b):\n    return a + b");
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let selector = CodeBlockSelector::new();
        let text = "```\nfirst()\n```\nOPTIMIZED:\n```\nsecond()\n```";

        assert_eq!(selector.select(text), "second()");
    }

    #[test]
    fn test_no_keyword_returns_first_block() {
        let selector = CodeBlockSelector::new();
        let text = "```rust\nfn a() {}\n```\ntext\n```rust\nfn b() {}\n```";

        assert_eq!(selector.select(text), "fn a() {}");
    }

    #[test]
    fn test_keyword_after_last_block_falls_back_to_first() {
        let selector = CodeBlockSelector::new();
        let text = "```\none()\n```\n```\ntwo()\n```\nThis is the correct answer.";

        assert_eq!(selector.select(text), "one()");
    }

    #[test]
    fn test_keyword_inside_code_is_not_prose() {
        let selector = CodeBlockSelector::new();
        let text = "```\n# updated helper\none()\n```\n```\ntwo()\n```";

        assert_eq!(selector.select(text), "one()");
    }

    #[test]
    fn test_keyword_is_matched_at_word_start() {
        let selector = CodeBlockSelector::new();
        let text = "```\none()\n```\nAn incorrect variant:\n```\ntwo()\n```";

        assert_eq!(selector.select(text), "one()");
    }

    #[test]
    fn test_tagged_fence_with_symbols() {
        let selector = CodeBlockSelector::new();
        let text = "```c++\nint main() { return 0; }\n```";

        assert_eq!(selector.select(text), "int main() { return 0; }");
    }

    #[test]
    fn test_plain_text_fallback() {
        let selector = CodeBlockSelector::new();
        let text = r#"
    def twosum(nums, target):
        nums.sort()
        left, right = 0, len(nums) - 1
        while left < right:
            current_sum = nums[left] + nums[right]
            if current_sum == target:
                return [left, right]
            elif current_sum < target:
                left += 1
            else:
                right -= 1
        return []
    "#;

        let selected = selector.select(text);
        assert!(selected.starts_with("def twosum(nums, target):"));
        assert!(selected.ends_with("return []"));
        assert_eq!(selected.lines().count(), 12);
    }

    #[test]
    fn test_plain_text_fallback_stops_at_prose() {
        let selector = CodeBlockSelector::new();
        let text = "Try this:\ndef f(x):\n    return x * 2\nThat doubles the input.";

        assert_eq!(selector.select(text), "def f(x):\n    return x * 2");
    }

    #[test]
    fn test_plain_text_prefers_run_after_keyword() {
        let selector = CodeBlockSelector::new();
        let text = "def f(x):\n    return x\n\nA simpler version:\ndef g(x):\n    return x + 1\n";

        assert_eq!(selector.select(text), "def g(x):\n    return x + 1");
    }

    #[test]
    fn test_prose_only_yields_empty() {
        let selector = CodeBlockSelector::new();
        assert_eq!(selector.select("No code here, just words."), "");
    }
}
