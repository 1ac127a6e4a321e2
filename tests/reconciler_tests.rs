// Tests for the transcript reconciliation algorithm.
//
// The recognition service re-emits final results across finalization
// windows; these tests pin down the dedup/merge behavior the client and
// the archive rely on.

use dictation_relay::TranscriptState;

#[test]
fn first_final_is_accepted_verbatim() {
    let mut state = TranscriptState::new();

    let accepted = state.accept_final("patient reports pain");
    assert_eq!(accepted.as_deref(), Some("patient reports pain"));
    assert_eq!(state.segment_count(), 1);
}

#[test]
fn empty_input_is_a_no_op() {
    let mut state = TranscriptState::new();
    assert_eq!(state.accept_final(""), None);
    assert!(state.is_empty());

    state.accept_final("hello there");
    assert_eq!(state.accept_final(""), None);
    assert_eq!(state.segment_count(), 1);
    // last_accepted is unchanged, so an exact repeat is still detected
    assert_eq!(state.accept_final("hello there"), None);
}

#[test]
fn exact_duplicate_yields_one_segment() {
    let mut state = TranscriptState::new();

    assert!(state.accept_final("hello there").is_some());
    assert_eq!(state.accept_final("hello there"), None);
    assert_eq!(state.segment_count(), 1);
}

#[test]
fn extension_accepts_only_the_new_part() {
    let mut state = TranscriptState::new();

    state.accept_final("patient reports pain");
    let accepted = state.accept_final("patient reports pain in left arm");

    assert_eq!(accepted.as_deref(), Some("in left arm"));
    assert_eq!(state.segment_count(), 2);
    assert_eq!(state.joined(), "patient reports pain in left arm");
}

#[test]
fn pure_repeat_after_extension_is_discarded() {
    let mut state = TranscriptState::new();

    state.accept_final("patient reports pain");
    state.accept_final("patient reports pain in left arm");

    // Resubmitting the superset matches against the *current* last
    // accepted text ("in left arm"); the leftover is old content and must
    // not be appended again.
    assert_eq!(state.accept_final("patient reports pain in left arm"), None);
    assert_eq!(state.segment_count(), 2);
    assert_eq!(state.joined(), "patient reports pain in left arm");
}

#[test]
fn extension_updates_last_accepted_to_the_remainder() {
    let mut state = TranscriptState::new();

    state.accept_final("patient reports pain");
    state.accept_final("patient reports pain in left arm");

    // "in left arm" is now the comparison point, so repeating it exactly
    // is a duplicate.
    assert_eq!(state.accept_final("in left arm"), None);
}

#[test]
fn repeat_of_an_older_segment_is_discarded() {
    let mut state = TranscriptState::new();

    state.accept_final("alpha");
    state.accept_final("bravo");
    state.accept_final("charlie");

    // Contains "bravo", which is inside the last-3 window.
    assert_eq!(state.accept_final("contains bravo inside it"), None);
    assert_eq!(state.segment_count(), 3);
}

#[test]
fn containment_window_is_bounded_to_three_segments() {
    let mut state = TranscriptState::new();

    state.accept_final("first utterance");
    state.accept_final("second utterance");
    state.accept_final("third utterance");
    state.accept_final("fourth utterance");

    // "first utterance" fell out of the 3-segment window, so a new final
    // containing it is accepted even though it restates old content.
    // Known limitation of the bounded containment check.
    let accepted = state.accept_final("again first utterance spoken");
    assert_eq!(accepted.as_deref(), Some("again first utterance spoken"));
    assert_eq!(state.segment_count(), 5);
}

#[test]
fn unrelated_finals_accumulate_in_order() {
    let mut state = TranscriptState::new();

    state.accept_final("take two tablets daily");
    state.accept_final("follow up in one week");
    state.accept_final("no known allergies");

    assert_eq!(
        state.joined(),
        "take two tablets daily follow up in one week no known allergies"
    );
}
