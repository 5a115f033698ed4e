//! Keyword parser: a case-insensitive, word-boundary-aware, single-pass
//! scanner over a commit message that extracts an ordered list of
//! [`Directive`] values (§4.4).
//!
//! Hand-rolled rather than regex-driven: every hot loop processes the
//! message in `O(n)` with constant lookahead, so a commit-message flood
//! can't turn version resolution quadratic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::parse_version;
use crate::prerelease_resolver::PreReleaseResolver;
use crate::version::Version;

static SHA_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{7,40}$").unwrap());

/// A recognised instruction embedded in a commit message.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    MajorChange,
    MinorChange,
    PatchChange,
    MajorSet(u32),
    MinorSet(u32),
    PatchSet(u32),
    /// Core-only: pre-release and metadata are dropped from the literal.
    TargetSet(Version),
    IgnoreSelf,
    IgnoreCommits(Vec<String>),
    IgnoreRange(String, String),
    IgnoreMerged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bump {
    Major,
    Minor,
    Patch,
}

/// `major ≡ breaking`; `minor ≡ feature ≡ feat`; `patch ≡ fix` (§4.4 "Bump
/// token equivalence").
fn bump_alias(word: &str) -> Option<Bump> {
    match word.to_ascii_lowercase().as_str() {
        "major" | "breaking" => Some(Bump::Major),
        "minor" | "feature" | "feat" => Some(Bump::Minor),
        "patch" | "fix" => Some(Bump::Patch),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Entry point: extract every directive from a commit message, top to
/// bottom, left to right. `resolver` is consulted for `target:` literals
/// so the same pre-release interpretation applies to tags and directives
/// alike.
pub fn parse_commit_message(message: &str, resolver: &dyn PreReleaseResolver) -> Vec<Directive> {
    let mut directives = Vec::new();
    for line in message.lines() {
        Scanner::new(line, resolver).scan_into(&mut directives);
    }
    directives
}

struct Scanner<'a> {
    line: &'a str,
    pos: usize,
    resolver: &'a dyn PreReleaseResolver,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str, resolver: &'a dyn PreReleaseResolver) -> Self {
        Self {
            line,
            pos: 0,
            resolver,
        }
    }

    fn left_boundary_ok(&self, start: usize) -> bool {
        match self.line[..start].chars().next_back() {
            None => true,
            Some(c) => !is_word_char(c),
        }
    }

    fn right_boundary_ok(&self, end: usize) -> bool {
        match self.line[end..].chars().next() {
            None => true,
            Some(c) => c == ':' || !is_word_char(c),
        }
    }

    /// Case-insensitive literal match at `self.pos`, honouring both
    /// boundaries. Returns the byte offset immediately after the literal.
    fn match_literal(&self, literal: &str) -> Option<usize> {
        let end = self.pos + literal.len();
        if end > self.line.len() {
            return None;
        }
        let slice = &self.line[self.pos..end];
        if !slice.eq_ignore_ascii_case(literal) {
            return None;
        }
        if !self.line.is_char_boundary(end) {
            return None;
        }
        if !self.left_boundary_ok(self.pos) || !self.right_boundary_ok(end) {
            return None;
        }
        Some(end)
    }

    /// Skips horizontal whitespace, consumes a `:`, skips whitespace again,
    /// and returns the resulting offset — or `None` if no colon is found
    /// before other non-whitespace content.
    fn skip_colon(&self, mut pos: usize) -> Option<usize> {
        pos = self.skip_ws(pos);
        if self.line.as_bytes().get(pos) != Some(&b':') {
            return None;
        }
        pos += 1;
        Some(self.skip_ws(pos))
    }

    fn skip_ws(&self, mut pos: usize) -> usize {
        while matches!(self.line.as_bytes().get(pos), Some(b' ') | Some(b'\t')) {
            pos += 1;
        }
        pos
    }

    /// Reads a run of word characters (plus `-`) starting at `pos`.
    fn read_word(&self, pos: usize) -> (&'a str, usize) {
        let rest = &self.line[pos..];
        let len = rest
            .char_indices()
            .take_while(|(_, c)| is_word_char(*c) || *c == '-')
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        (&rest[..len], pos + len)
    }

    fn scan_into(&mut self, out: &mut Vec<Directive>) {
        let len = self.line.len();
        while self.pos < len {
            if !self.line.is_char_boundary(self.pos) {
                self.pos += 1;
                continue;
            }
            let c = self.line[self.pos..].chars().next().unwrap();
            let lower = c.to_ascii_lowercase();
            if matches!(lower, 'b' | 'm' | 'f' | 'p' | 'v' | 't') {
                if let Some(consumed) = self.try_match_at(out) {
                    self.pos = consumed;
                    continue;
                }
            }
            self.pos += c.len_utf8();
        }
    }

    /// Tries, in priority order, `version:`, `target:`, `ignore-merged`
    /// (bare), and the standalone bump shorthand. Returns the new scan
    /// position on a match (whether or not a directive was actually
    /// emitted — malformed content is silently dropped but still consumes
    /// the matched region so it isn't re-scanned character by character).
    fn try_match_at(&self, out: &mut Vec<Directive>) -> Option<usize> {
        if let Some(after) = self.match_literal("version") {
            return Some(self.handle_version(after, out));
        }
        if let Some(after) = self.match_literal("target") {
            return Some(self.handle_target(after, out));
        }
        let (word, word_end) = self.read_word(self.pos);
        if !word.is_empty() {
            if let Some(bump) = bump_alias(word) {
                if self.left_boundary_ok(self.pos) && self.right_boundary_ok(word_end) {
                    return Some(self.handle_standalone(word_end, bump, out));
                }
            }
        }
        None
    }

    fn handle_version(&self, after: usize, out: &mut Vec<Directive>) -> usize {
        let Some(value_start) = self.skip_colon(after) else {
            return after;
        };

        if let Some(rest) = self.line[value_start..].strip_prefix_ignore_ascii_case("ignore-merged")
        {
            if rest.is_empty() || !is_word_char(rest.chars().next().unwrap()) {
                out.push(Directive::IgnoreMerged);
                return value_start + (self.line[value_start..].len() - rest.len());
            }
        }

        let (word, word_end) = self.read_word(value_start);
        if word.eq_ignore_ascii_case("ignore") {
            match self.skip_colon(word_end) {
                Some(list_start) => {
                    let value = self.rest_of_line(list_start);
                    if let Some(directive) = parse_ignore_list(value) {
                        out.push(directive);
                    }
                    self.line.len()
                }
                None => {
                    out.push(Directive::IgnoreSelf);
                    word_end
                }
            }
        } else if let Some(bump) = bump_alias(word) {
            match self.skip_colon(word_end) {
                Some(number_start) => {
                    let (number_word, number_end) = self.read_number_token(number_start);
                    match number_word.parse::<i64>() {
                        Ok(n) if (0..=i32::MAX as i64).contains(&n) => {
                            let n = n as u32;
                            out.push(match bump {
                                Bump::Major => Directive::MajorSet(n),
                                Bump::Minor => Directive::MinorSet(n),
                                Bump::Patch => Directive::PatchSet(n),
                            });
                        }
                        _ => {}
                    }
                    number_end
                }
                None => {
                    out.push(match bump {
                        Bump::Major => Directive::MajorChange,
                        Bump::Minor => Directive::MinorChange,
                        Bump::Patch => Directive::PatchChange,
                    });
                    word_end
                }
            }
        } else {
            word_end
        }
    }

    fn handle_target(&self, after: usize, out: &mut Vec<Directive>) -> usize {
        let Some(value_start) = self.skip_colon(after) else {
            return after;
        };
        let value = self.rest_of_line(value_start).trim();
        if !value.is_empty() {
            if let Ok(version) = parse_version(value, self.resolver) {
                out.push(Directive::TargetSet(version.core()));
            }
        }
        self.line.len()
    }

    fn handle_standalone(&self, after_word: usize, bump: Bump, out: &mut Vec<Directive>) -> usize {
        let Some(value_start) = self.skip_colon(after_word) else {
            return after_word;
        };
        let value = self.rest_of_line(value_start).trim();
        if !value.is_empty() {
            out.push(match bump {
                Bump::Major => Directive::MajorChange,
                Bump::Minor => Directive::MinorChange,
                Bump::Patch => Directive::PatchChange,
            });
        }
        self.line.len()
    }

    fn rest_of_line(&self, pos: usize) -> &'a str {
        &self.line[pos..]
    }

    /// Reads an optional leading `-` then a run of decimal digits.
    fn read_number_token(&self, pos: usize) -> (&'a str, usize) {
        let rest = &self.line[pos..];
        let mut iter = rest.char_indices().peekable();
        let mut end = 0;
        if let Some((_, '-')) = iter.peek() {
            end = 1;
            iter.next();
        }
        for (i, c) in iter {
            if c.is_ascii_digit() {
                end = i + 1;
            } else {
                break;
            }
        }
        (&rest[..end], pos + end)
    }
}

trait StripIgnoreCase {
    fn strip_prefix_ignore_ascii_case(&self, prefix: &str) -> Option<&str>;
}

impl StripIgnoreCase for str {
    fn strip_prefix_ignore_ascii_case(&self, prefix: &str) -> Option<&str> {
        if self.len() < prefix.len() {
            return None;
        }
        if self[..prefix.len()].eq_ignore_ascii_case(prefix) {
            Some(&self[prefix.len()..])
        } else {
            None
        }
    }
}

/// Parses the value following `version: ignore:` into either
/// [`Directive::IgnoreCommits`] (comma-separated hex prefixes) or
/// [`Directive::IgnoreRange`] (`from..to`). Malformed lists are discarded
/// wholesale rather than partially accepted.
fn parse_ignore_list(value: &str) -> Option<Directive> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some((from, to)) = value.split_once("..") {
        let from = from.trim();
        let to = to.trim();
        if is_sha_prefix(from) && is_sha_prefix(to) {
            return Some(Directive::IgnoreRange(from.to_string(), to.to_string()));
        }
        return None;
    }

    let prefixes: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();
    if prefixes.iter().all(|p| is_sha_prefix(p)) {
        Some(Directive::IgnoreCommits(prefixes))
    } else {
        None
    }
}

fn is_sha_prefix(s: &str) -> bool {
    SHA_PREFIX.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prerelease_resolver::DefaultPreReleaseResolver;

    fn directives(message: &str) -> Vec<Directive> {
        parse_commit_message(message, &DefaultPreReleaseResolver)
    }

    #[test]
    fn reversion_and_retarget_do_not_match() {
        assert!(directives("reversion: 1.0.0").is_empty());
        assert!(directives("retarget: 2.0.0").is_empty());
    }

    #[test]
    fn version_major_is_case_insensitive() {
        assert_eq!(directives("version: MAJOR"), vec![Directive::MajorChange]);
        assert_eq!(directives("Version: major"), vec![Directive::MajorChange]);
    }

    #[test]
    fn breaking_without_text_produces_nothing() {
        assert!(directives("breaking:").is_empty());
    }

    #[test]
    fn breaking_with_text_produces_major_change() {
        assert_eq!(
            directives("breaking: drop legacy flag"),
            vec![Directive::MajorChange]
        );
    }

    #[test]
    fn negative_absolute_set_is_discarded() {
        assert!(directives("version: major: -1").is_empty());
    }

    #[test]
    fn overflowing_absolute_set_is_discarded() {
        assert!(directives("version: major: 99999999999").is_empty());
    }

    #[test]
    fn absolute_set_parses() {
        assert_eq!(
            directives("version: minor: 7"),
            vec![Directive::MinorSet(7)]
        );
    }

    #[test]
    fn ignore_self() {
        assert_eq!(directives("version: ignore"), vec![Directive::IgnoreSelf]);
    }

    #[test]
    fn ignore_commit_list() {
        assert_eq!(
            directives("version: ignore: abc1234,def5678"),
            vec![Directive::IgnoreCommits(vec![
                "abc1234".into(),
                "def5678".into()
            ])]
        );
    }

    #[test]
    fn ignore_short_prefix_is_discarded() {
        assert!(directives("version: ignore: abc12").is_empty());
    }

    #[test]
    fn ignore_range() {
        assert_eq!(
            directives("version: ignore: abc1234..def5678"),
            vec![Directive::IgnoreRange("abc1234".into(), "def5678".into())]
        );
    }

    #[test]
    fn ignore_merged() {
        assert_eq!(
            directives("version: ignore-merged"),
            vec![Directive::IgnoreMerged]
        );
    }

    #[test]
    fn target_directive_drops_prerelease_and_metadata() {
        let result = directives("target: 2.2.4-rc.1+build.1");
        match &result[..] {
            [Directive::TargetSet(v)] => {
                assert_eq!(v.to_string(), "2.2.4");
                assert!(v.is_final());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_target_literal_is_discarded() {
        assert!(directives("target: not-a-version").is_empty());
    }

    #[test]
    fn whitespace_around_colon_is_tolerated() {
        assert_eq!(
            directives("version  :   minor"),
            vec![Directive::MinorChange]
        );
    }

    #[test]
    fn substring_inside_larger_identifier_does_not_match() {
        assert!(directives("versioning: major").is_empty());
        assert!(directives("majority: thing").is_empty());
    }

    #[test]
    fn multiple_directives_in_one_message_preserve_order() {
        let message = "feat: add thing\n\nversion: ignore-merged\ntarget: 3.0.0";
        assert_eq!(
            directives(message),
            vec![
                Directive::MinorChange,
                Directive::IgnoreMerged,
                Directive::TargetSet("3.0.0".parse().unwrap()),
            ]
        );
    }
}
