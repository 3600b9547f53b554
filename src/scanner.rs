//! Incremental fenced-code-block scanner over a streamed response.
//!
//! Fragments of arbitrary size arrive from the network; the scanner emits
//! plain text as soon as no partial fence marker could still be forming,
//! and buffers a fenced block in full before emitting it as one unit.

const FENCE: &str = "```";

/// Output unit produced by the scanner, in strict arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Pass-through text, written verbatim.
    Text(String),
    /// A complete fenced block: the language tag from the fence line (may
    /// be empty) and the interior payload without the fence lines.
    CodeBlock { lang: String, code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    OutsideBlock,
    /// An opening fence was seen and its closing marker has not arrived.
    InsideUnresolvedBlock,
}

/// Two-state incremental scanner over a single growable buffer.
///
/// The full concatenated input is retained as a side channel
/// ([`FenceScanner::transcript`]) for persistence, independent of how many
/// events were emitted.
#[derive(Debug, Default)]
pub struct FenceScanner {
    buffer: String,
    transcript: String,
}

impl FenceScanner {
    /// Append a fragment and drain every fully-resolved region.
    pub fn feed(&mut self, fragment: &str) -> Vec<ScanEvent> {
        self.transcript.push_str(fragment);
        self.buffer.push_str(fragment);

        let mut events = Vec::new();
        loop {
            let Some(start) = self.buffer.find(FENCE) else {
                self.flush_plain(&mut events);
                break;
            };

            let Some(end) = find_fence_from(&self.buffer, start + FENCE.len()) else {
                // No closing marker yet; it may arrive in a future fragment.
                // Emit the prefix and keep the unresolved region buffered.
                if start > 0 {
                    events.push(ScanEvent::Text(self.buffer[..start].to_string()));
                    self.buffer.drain(..start);
                }
                break;
            };

            if start > 0 {
                events.push(ScanEvent::Text(self.buffer[..start].to_string()));
            }
            let raw = &self.buffer[start + FENCE.len()..end];
            let (lang, code) = split_fenced_block(raw);
            events.push(ScanEvent::CodeBlock { lang, code });
            self.buffer.drain(..end + FENCE.len());
        }

        events
    }

    /// Flush whatever is still buffered as plain text, ending the stream.
    ///
    /// An unterminated fence is emitted verbatim: it cannot be known to be
    /// complete, so it is never styled and never dropped.
    pub fn finish(&mut self) -> Option<ScanEvent> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(ScanEvent::Text(std::mem::take(&mut self.buffer)))
    }

    #[must_use]
    pub fn state(&self) -> ScanState {
        if self.buffer.contains(FENCE) {
            ScanState::InsideUnresolvedBlock
        } else {
            ScanState::OutsideBlock
        }
    }

    /// The full concatenated input seen so far.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    #[must_use]
    pub fn into_transcript(self) -> String {
        self.transcript
    }

    // No fence marker is buffered. Everything can be written through except
    // a trailing run of backticks that the next fragment could extend into
    // a full marker.
    fn flush_plain(&mut self, events: &mut Vec<ScanEvent>) {
        let held = trailing_backticks(&self.buffer).min(FENCE.len() - 1);
        let emit_to = self.buffer.len() - held;
        if emit_to > 0 {
            events.push(ScanEvent::Text(self.buffer[..emit_to].to_string()));
            self.buffer.drain(..emit_to);
        }
    }
}

fn find_fence_from(haystack: &str, from: usize) -> Option<usize> {
    haystack[from..].find(FENCE).map(|index| index + from)
}

fn trailing_backticks(value: &str) -> usize {
    value.bytes().rev().take_while(|byte| *byte == b'`').count()
}

// Interior of a fence pair, markers excluded. The first line is the
// language tag; the payload is everything after it, minus the newline that
// precedes the closing marker.
fn split_fenced_block(raw: &str) -> (String, String) {
    match raw.find('\n') {
        Some(newline) => {
            let lang = raw[..newline].trim().to_string();
            let mut code = raw[newline + 1..].to_string();
            if code.ends_with('\n') {
                code.pop();
            }
            (lang, code)
        }
        None => (raw.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::{FenceScanner, ScanEvent, ScanState};

    fn drain(scanner: &mut FenceScanner, fragments: &[&str]) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        for fragment in fragments {
            events.extend(scanner.feed(fragment));
        }
        events.extend(scanner.finish());
        events
    }

    fn reconstruct(events: &[ScanEvent]) -> String {
        let mut out = String::new();
        for event in events {
            match event {
                ScanEvent::Text(text) => out.push_str(text),
                ScanEvent::CodeBlock { lang, code } => {
                    out.push_str(&format!("```{lang}\n{code}\n```"));
                }
            }
        }
        out
    }

    #[test]
    fn plain_text_passes_through() {
        let mut scanner = FenceScanner::default();
        let events = drain(&mut scanner, &["hello ", "world"]);
        assert_eq!(reconstruct(&events), "hello world");
        assert!(events
            .iter()
            .all(|event| matches!(event, ScanEvent::Text(_))));
    }

    #[test]
    fn single_fragment_block_yields_one_highlighted_unit() {
        let mut scanner = FenceScanner::default();
        let events = drain(&mut scanner, &["```js\nconsole.log(1)\n```"]);

        assert_eq!(
            events,
            vec![ScanEvent::CodeBlock {
                lang: "js".to_owned(),
                code: "console.log(1)".to_owned(),
            }]
        );
    }

    #[test]
    fn every_split_boundary_yields_identical_output() {
        let input = "before ```js\nconsole.log(1)\n``` after";
        let mut reference = FenceScanner::default();
        let expected = drain(&mut reference, &[input]);
        let expected = reconstruct(&expected);

        for split in 0..=input.len() {
            if !input.is_char_boundary(split) {
                continue;
            }
            let mut scanner = FenceScanner::default();
            let events = drain(&mut scanner, &[&input[..split], &input[split..]]);
            assert_eq!(
                reconstruct(&events),
                expected,
                "split at byte {split} diverged"
            );
            let blocks = events
                .iter()
                .filter(|event| matches!(event, ScanEvent::CodeBlock { .. }))
                .count();
            assert_eq!(blocks, 1, "split at byte {split} lost the code block");
        }
    }

    #[test]
    fn unterminated_fence_flushes_verbatim_at_end_of_stream() {
        let mut scanner = FenceScanner::default();
        let mut events = scanner.feed("```js\nconsole.log(1)");
        assert!(events.is_empty());
        assert_eq!(scanner.state(), ScanState::InsideUnresolvedBlock);

        events.extend(scanner.finish());
        assert_eq!(
            events,
            vec![ScanEvent::Text("```js\nconsole.log(1)".to_owned())]
        );
    }

    #[test]
    fn adjacent_blocks_resolve_independently_in_order() {
        let mut scanner = FenceScanner::default();
        let events = drain(&mut scanner, &["a```py\n1\n```b```py\n2\n```c"]);

        assert_eq!(
            events,
            vec![
                ScanEvent::Text("a".to_owned()),
                ScanEvent::CodeBlock {
                    lang: "py".to_owned(),
                    code: "1".to_owned(),
                },
                ScanEvent::Text("b".to_owned()),
                ScanEvent::CodeBlock {
                    lang: "py".to_owned(),
                    code: "2".to_owned(),
                },
                ScanEvent::Text("c".to_owned()),
            ]
        );
    }

    #[test]
    fn empty_payload_is_an_empty_block_not_an_error() {
        let mut scanner = FenceScanner::default();
        let events = drain(&mut scanner, &["```\n```"]);

        assert_eq!(
            events,
            vec![ScanEvent::CodeBlock {
                lang: String::new(),
                code: String::new(),
            }]
        );
    }

    #[test]
    fn partial_trailing_marker_is_held_back() {
        let mut scanner = FenceScanner::default();

        let events = scanner.feed("text``");
        assert_eq!(events, vec![ScanEvent::Text("text".to_owned())]);

        // The held backticks turn out to be literal; they flush once the
        // next fragment rules out a forming fence.
        let events = scanner.feed("x");
        assert_eq!(events, vec![ScanEvent::Text("``x".to_owned())]);
    }

    #[test]
    fn held_backticks_complete_into_a_fence() {
        let mut scanner = FenceScanner::default();
        let mut events = scanner.feed("before``");
        events.extend(scanner.feed("`rust\nlet x = 1;\n``"));
        events.extend(scanner.feed("`"));

        assert_eq!(
            events,
            vec![
                ScanEvent::Text("before".to_owned()),
                ScanEvent::CodeBlock {
                    lang: "rust".to_owned(),
                    code: "let x = 1;".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn text_before_open_fence_is_emitted_immediately() {
        let mut scanner = FenceScanner::default();
        let events = scanner.feed("intro\n```rust\nunfinished");

        assert_eq!(events, vec![ScanEvent::Text("intro\n".to_owned())]);
        assert_eq!(scanner.state(), ScanState::InsideUnresolvedBlock);
    }

    #[test]
    fn transcript_side_channel_reproduces_full_input() {
        let mut scanner = FenceScanner::default();
        let fragments = ["a```p", "y\n1\n`", "``b", "``", "`js\ntail"];
        for fragment in fragments {
            scanner.feed(fragment);
        }
        scanner.finish();

        assert_eq!(scanner.transcript(), fragments.concat());
    }

    #[test]
    fn block_without_language_tag_has_empty_lang() {
        let mut scanner = FenceScanner::default();
        let events = drain(&mut scanner, &["```\nplain payload\n```"]);

        assert_eq!(
            events,
            vec![ScanEvent::CodeBlock {
                lang: String::new(),
                code: "plain payload".to_owned(),
            }]
        );
    }

    #[test]
    fn multibyte_text_around_blocks_is_preserved() {
        let input = "héllo ```py\nprint('é')\n``` wörld";
        let mut scanner = FenceScanner::default();
        let events = drain(&mut scanner, &[input]);
        assert_eq!(reconstruct(&events), input);
    }
}
