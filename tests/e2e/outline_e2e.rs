//! E2E tests for outline editing on top of the attributed text store.
//!
//! Run with:
//!   cargo test --test `outline_e2e` -- --nocapture
//! With logging:
//!   `RUST_LOG=debug` cargo test --test `outline_e2e` -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use outline_storage::{
    Attachment, AttachmentKind, AttributeKey, AttributeValue, ChangeListener, EditAction,
    EditEvent, EditedMask, HiddenValue, TextStore,
};
use tracing::{Level, debug, info, span};

const OUTLINE: &str = include_str!("fixtures/todo.org");

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_test_writer()
        .try_init();
}

/// Char offset of the first occurrence of `needle`.
fn offset_of(text: &str, needle: &str) -> usize {
    let byte = text
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not in text"));
    text[..byte].chars().count()
}

/// Mark every `*`-prefixed line with its heading level. Returns the count.
fn mark_headings(store: &mut TextStore) -> usize {
    let text = store.text();
    let mut offset = 0;
    let mut count = 0;
    for line in text.split_inclusive('\n') {
        let len = line.chars().count();
        let stars = line.chars().take_while(|c| *c == '*').count();
        if stars > 0 && line.chars().nth(stars) == Some(' ') {
            store
                .set_attribute(
                    AttributeKey::HeadingLevel,
                    AttributeValue::Int(stars as i64),
                    offset..offset + len,
                )
                .unwrap();
            count += 1;
        }
        offset += len;
    }
    count
}

/// Mark `- [ ]` / `- [X]` lines as checkboxes.
fn mark_checkboxes(store: &mut TextStore) -> usize {
    let text = store.text();
    let mut offset = 0;
    let mut count = 0;
    for line in text.split_inclusive('\n') {
        let len = line.chars().count();
        if line.starts_with("- [") && line.chars().nth(4) == Some(']') {
            let status: String = line.chars().skip(2).take(3).collect();
            store
                .set_attribute(AttributeKey::Checkbox, true, offset..offset + len)
                .unwrap();
            store
                .set_attribute(
                    AttributeKey::CheckboxStatus,
                    status,
                    offset + 2..offset + 5,
                )
                .unwrap();
            count += 1;
        }
        offset += len;
    }
    count
}

/// Tracks one char position across edits, the way a cursor would.
#[derive(Default)]
struct Bookmark {
    pos: AtomicUsize,
    events: AtomicUsize,
}

impl ChangeListener for Bookmark {
    fn on_content_change(&self, event: &EditEvent) {
        self.events.fetch_add(1, Ordering::SeqCst);
        if !event.edited.contains(EditedMask::CHARACTERS) {
            return;
        }
        let pos = self.pos.load(Ordering::SeqCst);
        let moved = if pos >= event.range.end {
            pos.checked_add_signed(event.delta).unwrap_or(0)
        } else if pos > event.range.start {
            event.range.start
        } else {
            pos
        };
        debug!(from = pos, to = moved, "bookmark moved");
        self.pos.store(moved, Ordering::SeqCst);
    }
}

#[test]
fn e2e_outline_markup_and_folding() {
    init_logging();
    let span = span!(Level::INFO, "e2e_outline_folding");
    let _enter = span.enter();

    let mut store = TextStore::with_text(OUTLINE);
    let bookmark = Arc::new(Bookmark::default());
    bookmark
        .pos
        .store(offset_of(OUTLINE, "Projects"), Ordering::SeqCst);
    store.register_change_listener(&bookmark);

    assert_eq!(mark_headings(&mut store), 3);
    assert_eq!(mark_checkboxes(&mut store), 2);
    info!(ranges = store.ranges().len(), "outline marked up");

    let todo = offset_of(OUTLINE, "TODO");
    assert_eq!(
        store.attribute_at(AttributeKey::HeadingLevel, todo),
        Some(&AttributeValue::Int(2))
    );
    let eggs = offset_of(OUTLINE, "[ ]");
    assert_eq!(
        store
            .attribute_at(AttributeKey::CheckboxStatus, eggs)
            .and_then(AttributeValue::as_text),
        Some("[ ]")
    );

    // Fold the TODO heading: hide everything up to the next heading.
    let heading = store.line_range(todo).unwrap();
    let body = heading.end..offset_of(OUTLINE, "* Projects");
    store
        .set_attribute(AttributeKey::HeadingFolded, true, heading.clone())
        .unwrap();
    store
        .set_attribute(AttributeKey::Hidden, HiddenValue::Folded, body.clone())
        .unwrap();
    assert_eq!(store.effective_range(AttributeKey::Hidden, body.start), Some(body.clone()));

    // New heading at the top shifts every range and the bookmark.
    let archive = "* Archive\n";
    let shift = archive.chars().count();
    let event = store.insert(0, archive).unwrap().unwrap();
    assert_eq!(event.action, EditAction::Insert);
    assert_eq!(event.delta, shift as isize);
    assert_eq!(
        store.effective_range(AttributeKey::Hidden, body.start + shift),
        Some(body.start + shift..body.end + shift)
    );
    assert_eq!(
        bookmark.pos.load(Ordering::SeqCst),
        offset_of(&store.text(), "Projects")
    );

    // Typing inside the folded body extends the hidden range.
    let inside = body.start + shift + 3;
    store.insert(inside, "x").unwrap();
    assert_eq!(
        store.effective_range(AttributeKey::Hidden, inside),
        Some(body.start + shift..body.end + shift + 1)
    );

    // Delete the whole subtree: its attributes go with it.
    let text = store.text();
    let subtree = offset_of(&text, "** TODO")..offset_of(&text, "* Projects");
    let removed_len = subtree.len();
    let before = store.revision();
    let event = store.delete(subtree.clone()).unwrap().unwrap();
    assert_eq!(event.action, EditAction::Delete);
    assert_eq!(event.removed.chars().count(), removed_len);
    assert_eq!(store.revision(), before + 1);

    assert_eq!(store.ranges_for(AttributeKey::Hidden).count(), 0);
    assert_eq!(store.ranges_for(AttributeKey::Checkbox).count(), 0);
    assert_eq!(store.ranges_for(AttributeKey::HeadingFolded).count(), 0);
    let levels: Vec<_> = store
        .ranges_for(AttributeKey::HeadingLevel)
        .filter_map(|attr| attr.value.as_int())
        .collect();
    assert_eq!(levels, vec![1, 1]);
    assert_eq!(
        bookmark.pos.load(Ordering::SeqCst),
        offset_of(&store.text(), "Projects")
    );

    // Every committed edit reached the listener exactly once.
    assert_eq!(
        bookmark.events.load(Ordering::SeqCst) as u64,
        store.revision()
    );
    info!(revision = store.revision(), "outline edits complete");
}

#[test]
fn e2e_attachment_lifecycle() {
    init_logging();
    let span = span!(Level::INFO, "e2e_attachments");
    let _enter = span.enter();

    let mut store = TextStore::with_text(OUTLINE);
    let line = store.line_range(offset_of(OUTLINE, "#+ATTACHMENT")).unwrap();
    let key_start = offset_of(OUTLINE, "img-1");

    store
        .set_attribute(
            AttributeKey::Attachment,
            AttributeValue::attachment("img-1"),
            line.clone(),
        )
        .unwrap();
    store
        .set_attribute(AttributeKey::AttachmentType, "image", line.clone())
        .unwrap();
    store
        .set_attribute(AttributeKey::AttachmentValue, "img-1", key_start..key_start + 5)
        .unwrap();

    // Nothing cached yet: the attribute resolves to nothing.
    assert!(store.attachment_at(line.start).is_none());

    let image = Arc::new(
        Attachment::new(AttachmentKind::Image, "img-1").with_description("whiteboard photo"),
    );
    store.add_attachment(Arc::clone(&image), "img-1").unwrap();
    let resolved = store.attachment_at(line.start).unwrap();
    assert!(Arc::ptr_eq(&resolved, &image));
    assert!(resolved.kind.is_visual());

    // Overwriting the key replaces what the attribute resolves to.
    let sketch = Arc::new(Attachment::new(AttachmentKind::Sketch, "img-1"));
    store.add_attachment(Arc::clone(&sketch), "img-1").unwrap();
    assert!(Arc::ptr_eq(&store.attachment_at(line.start).unwrap(), &sketch));
    assert_eq!(store.attachment_count(), 1);

    // Evicted: flag the range as unavailable rather than dropping it.
    store.remove_attachment("img-1");
    assert!(store.cached_attachment("img-1").is_none());
    store
        .set_attribute(AttributeKey::AttachmentUnavailable, true, line.clone())
        .unwrap();
    assert_eq!(store.attributes_at(line.start).count(), 3);
    info!(attachments = store.attachment_count(), "attachment lifecycle complete");
}

#[test]
fn e2e_shared_store_across_threads() {
    init_logging();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = Arc::new(move |event: &EditEvent| {
        sink.lock().unwrap().push(event.revision);
    });

    let store = Arc::new(Mutex::new(TextStore::new()));
    store.lock().unwrap().register_change_listener(&listener);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..25 {
                    let mut store = store.lock().unwrap();
                    let at = store.len_chars();
                    store.insert(at, &worker.to_string()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = store.lock().unwrap();
    assert_eq!(store.len_chars(), 100);
    assert_eq!(store.revision(), 100);

    // Revisions are delivered in commit order with no gaps.
    let seen = seen.lock().unwrap();
    assert_eq!(*seen, (1..=100).collect::<Vec<u64>>());
}
