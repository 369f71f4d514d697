use super::*;
use shared::{domain::PDF_MEDIA_TYPE, error::ErrorCode, protocol::UNKNOWN_FAILURE_MESSAGE};

fn pdf(name: &str) -> FileCandidate {
    FileCandidate::new(name, 4096, Some(PDF_MEDIA_TYPE.to_string()), name)
}

fn success(draft: &str, sources: &[&str]) -> BackendResponse {
    BackendResponse::Success(DraftReply {
        draft: draft.to_string(),
        source_filenames: sources.iter().map(|s| s.to_string()).collect(),
        warnings: Vec::new(),
    })
}

fn failure(error: Option<&str>, warnings: &[&str]) -> BackendResponse {
    BackendResponse::Failure(FailureReply {
        code: ErrorCode::Application,
        error: error.map(str::to_string),
        warnings: warnings.iter().map(|s| s.to_string()).collect(),
        preserved_draft: None,
    })
}

fn session_with_files(policy: AdjustmentFailurePolicy, names: &[&str]) -> Session {
    Session::new(policy)
        .offer_files(names.iter().map(|name| pdf(name)).collect())
        .session
}

fn session_on_result(policy: AdjustmentFailurePolicy, draft: &str) -> Session {
    let submitted = session_with_files(policy, &["a.pdf", "b.pdf"]).request_submit();
    submitted
        .session
        .handle_backend_response(success(draft, &["a.pdf", "b.pdf"]))
        .session
}

#[test]
fn new_session_starts_on_empty_upload_screen() {
    let session = Session::default();
    assert_eq!(session.kind(), ScreenKind::Upload);
    assert_eq!(session.draft(), None);
    assert!(session.source_filenames().is_empty());
    assert!(!session.is_busy());
    assert_eq!(session.error_message(), None);
    assert!(session.warnings().is_empty());
    assert_eq!(session.pending().map(PendingFileSet::len), Some(0));
}

#[test]
fn submitting_two_pdfs_and_succeeding_shows_result() {
    let session = session_with_files(AdjustmentFailurePolicy::default(), &["a.pdf", "b.pdf"]);

    let submitted = session.request_submit();
    assert!(submitted.session.is_busy());
    let [SessionEffect::SubmitFiles(files)] = submitted.effects.as_slice() else {
        panic!("expected a single submit effect, got {:?}", submitted.effects);
    };
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);

    let shown = submitted
        .session
        .handle_backend_response(success("Text", &["a.pdf", "b.pdf"]));
    assert_eq!(shown.effects, vec![SessionEffect::ScrollToTop]);

    let session = shown.session;
    assert_eq!(session.kind(), ScreenKind::Result);
    assert_eq!(session.draft(), Some("Text"));
    assert_eq!(session.source_filenames(), ["a.pdf", "b.pdf"]);
    assert!(!session.is_busy());
    assert_eq!(session.error_message(), None);
    assert!(session.pending().is_none());
}

#[test]
fn success_replaces_warnings_and_clears_error() {
    let session = Session::default().request_submit().session;
    assert_eq!(session.error_message(), Some(NO_FILES_MESSAGE));

    let reply = BackendResponse::Success(DraftReply {
        draft: "Minuta".to_string(),
        source_filenames: Vec::new(),
        warnings: vec!["page 3 unreadable".to_string()],
    });
    let session = session.handle_backend_response(reply).session;
    assert_eq!(session.error_message(), None);
    assert_eq!(session.warnings(), ["page 3 unreadable"]);
    assert!(session.source_filenames().is_empty());
}

#[test]
fn every_failure_lands_on_upload_with_a_message() {
    let responses = vec![
        failure(Some("Nenhum arquivo PDF válido foi fornecido."), &[]),
        failure(None, &[]),
        failure(Some("   "), &["w"]),
        BackendResponse::validation("bad input"),
    ];

    for response in responses {
        let on_upload = session_with_files(AdjustmentFailurePolicy::KeepLastDraft, &["a.pdf"])
            .request_submit()
            .session;
        let on_result = session_on_result(AdjustmentFailurePolicy::KeepLastDraft, "Draft");

        for start in [on_upload, on_result] {
            let session = start.handle_backend_response(response.clone()).session;
            assert_eq!(session.kind(), ScreenKind::Upload);
            assert_eq!(session.draft(), None);
            assert!(!session.is_busy());
            assert!(
                session.error_message().is_some_and(|m| !m.trim().is_empty()),
                "error must be visible for {response:?}"
            );
        }
    }
}

#[test]
fn failure_without_message_uses_generic_fallback() {
    let session = Session::default()
        .handle_backend_response(failure(None, &["only a warning"]))
        .session;
    assert_eq!(session.error_message(), Some(UNKNOWN_FAILURE_MESSAGE));
    assert_eq!(session.warnings(), ["only a warning"]);
}

#[test]
fn failed_upload_keeps_pending_files_for_retry() {
    let session = session_with_files(AdjustmentFailurePolicy::default(), &["a.pdf"])
        .request_submit()
        .session
        .handle_backend_response(failure(Some("Falha"), &[]))
        .session;

    assert_eq!(session.pending().map(PendingFileSet::len), Some(1));
    let retry = session.request_submit();
    assert!(matches!(retry.effects.as_slice(), [SessionEffect::SubmitFiles(_)]));
}

#[test]
fn failure_after_result_keeps_known_filenames_visible() {
    let session = session_on_result(AdjustmentFailurePolicy::RevertToUpload, "Draft")
        .handle_backend_response(failure(Some("Erro"), &[]))
        .session;

    assert_eq!(session.kind(), ScreenKind::Upload);
    assert_eq!(session.source_filenames(), ["a.pdf", "b.pdf"]);
    assert_eq!(session.pending().map(PendingFileSet::len), Some(0));
}

#[test]
fn new_analysis_resets_everything_from_any_state() {
    let busy_result = session_on_result(AdjustmentFailurePolicy::RevertToUpload, "Draft")
        .request_adjustment("shorter")
        .session;
    assert!(busy_result.is_busy());

    let reset = busy_result.start_new_analysis();
    assert!(reset.effects.is_empty());
    assert_eq!(reset.session, Session::new(AdjustmentFailurePolicy::RevertToUpload));

    let with_error = Session::default().request_submit().session;
    assert_eq!(with_error.start_new_analysis().session, Session::default());
}

#[test]
fn submit_while_busy_is_a_no_op() {
    let submitted = session_with_files(AdjustmentFailurePolicy::default(), &["a.pdf"]).request_submit();
    assert_eq!(submitted.effects.len(), 1);

    let again = submitted.session.clone().request_submit();
    assert!(again.effects.is_empty());
    assert_eq!(again.session, submitted.session);
}

#[test]
fn adjustment_while_busy_is_a_no_op() {
    let adjusting = session_on_result(AdjustmentFailurePolicy::default(), "Draft")
        .request_adjustment("add jurisprudence");
    assert_eq!(adjusting.effects.len(), 1);

    let again = adjusting.session.clone().request_adjustment("something else");
    assert!(again.effects.is_empty());
    assert_eq!(again.session, adjusting.session);
}

#[test]
fn submit_with_no_files_is_a_validation_error_without_effects() {
    let transition = Session::default().request_submit();
    assert!(transition.effects.is_empty());
    assert!(!transition.session.is_busy());
    assert_eq!(transition.session.error_message(), Some(NO_FILES_MESSAGE));
}

#[test]
fn blank_adjustment_is_a_validation_error_without_effects() {
    for instructions in ["", "   ", "\n\t"] {
        let transition = session_on_result(AdjustmentFailurePolicy::default(), "Draft")
            .request_adjustment(instructions);
        assert!(transition.effects.is_empty());
        assert!(!transition.session.is_busy());
        assert_eq!(transition.session.error_message(), Some(NO_INSTRUCTIONS_MESSAGE));
        assert_eq!(transition.session.draft(), Some("Draft"));
    }
}

#[test]
fn adjustment_dispatch_carries_current_draft_and_clears_warnings() {
    let session = session_on_result(AdjustmentFailurePolicy::default(), "Draft")
        .handle_backend_response(BackendResponse::Success(DraftReply {
            draft: "Draft".to_string(),
            source_filenames: vec!["a.pdf".to_string()],
            warnings: vec!["old warning".to_string()],
        }))
        .session;
    assert_eq!(session.warnings(), ["old warning"]);

    let transition = session.request_adjustment("Reforce a prescrição");
    assert!(transition.session.warnings().is_empty());
    assert_eq!(
        transition.effects,
        vec![SessionEffect::RequestAdjustment {
            instructions: "Reforce a prescrição".to_string(),
            current_draft: "Draft".to_string(),
        }]
    );
}

#[test]
fn adjustment_on_upload_screen_is_rejected() {
    let transition = Session::default().request_adjustment("anything");
    assert!(transition.effects.is_empty());
    assert_eq!(transition.session.error_message(), Some(NOT_ON_RESULT_MESSAGE));
}

#[test]
fn files_cannot_be_offered_on_result_screen() {
    let session = session_on_result(AdjustmentFailurePolicy::default(), "Draft")
        .offer_files(vec![pdf("late.pdf")])
        .session;
    assert_eq!(session.kind(), ScreenKind::Result);
    assert_eq!(session.error_message(), Some(NOT_ON_UPLOAD_MESSAGE));
}

#[test]
fn intake_warnings_surface_as_error_but_accepted_files_are_kept() {
    let candidates = vec![
        pdf("a.pdf"),
        FileCandidate::new("b.txt", 10, Some("text/plain".to_string()), "b.txt"),
    ];
    let session = Session::default().offer_files(candidates).session;

    assert_eq!(session.pending().map(PendingFileSet::len), Some(1));
    assert!(session
        .error_message()
        .is_some_and(|m| m.contains("Only PDF files are allowed")));
}

#[test]
fn files_can_be_removed_by_id_or_name() {
    let session = session_with_files(AdjustmentFailurePolicy::default(), &["a.pdf", "a.pdf", "b.pdf"]);
    let first_id = session.pending().expect("upload").files()[0].id;

    let session = session.remove_file(first_id).session;
    assert_eq!(session.pending().map(PendingFileSet::len), Some(2));

    let session = session.remove_files_named("a.pdf").session;
    let names: Vec<_> = session
        .pending()
        .expect("upload")
        .files()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(names, vec!["b.pdf".to_string()]);
}

// Failed adjustments: the policy decides whether the last good draft stays on
// screen. Both behaviors are pinned here.

#[test]
fn failed_adjustment_keeps_last_draft_by_default() {
    let adjusting = session_on_result(AdjustmentFailurePolicy::KeepLastDraft, "Good draft")
        .request_adjustment("make it longer")
        .session;

    let response = failure(Some("Falha no ajuste"), &["retry later"]).with_preserved_draft("Good draft");
    let transition = adjusting.handle_adjustment_response(response);
    assert!(transition.effects.is_empty());

    let session = transition.session;
    assert_eq!(session.kind(), ScreenKind::Result);
    assert_eq!(session.draft(), Some("Good draft"));
    assert_eq!(session.source_filenames(), ["a.pdf", "b.pdf"]);
    assert_eq!(session.error_message(), Some("Falha no ajuste"));
    assert_eq!(session.warnings(), ["retry later"]);
    assert!(!session.is_busy());
}

#[test]
fn failed_adjustment_reverts_to_upload_when_configured() {
    let adjusting = session_on_result(AdjustmentFailurePolicy::RevertToUpload, "Good draft")
        .request_adjustment("make it longer")
        .session;

    let response = failure(Some("Falha no ajuste"), &[]).with_preserved_draft("Good draft");
    let session = adjusting.handle_adjustment_response(response).session;

    assert_eq!(session.kind(), ScreenKind::Upload);
    assert_eq!(session.draft(), None);
    assert_eq!(session.error_message(), Some("Falha no ajuste"));
    assert!(!session.is_busy());
}

#[test]
fn successful_adjustment_replaces_draft() {
    let session = session_on_result(AdjustmentFailurePolicy::KeepLastDraft, "v1")
        .apply(SessionEvent::AdjustmentRequested("v2 please".to_string()))
        .session
        .apply(SessionEvent::BackendResponded {
            kind: RequestKind::Adjustment,
            response: success("v2", &["a.pdf", "b.pdf"]),
        });

    assert_eq!(session.effects, vec![SessionEffect::ScrollToTop]);
    assert_eq!(session.session.draft(), Some("v2"));
}

#[test]
fn adjustment_failure_after_reset_falls_back_to_generic_handling() {
    let session = session_on_result(AdjustmentFailurePolicy::KeepLastDraft, "Draft")
        .request_adjustment("x")
        .session
        .start_new_analysis()
        .session
        .handle_adjustment_response(failure(Some("late failure"), &[]).with_preserved_draft("Draft"))
        .session;

    assert_eq!(session.kind(), ScreenKind::Upload);
    assert_eq!(session.error_message(), Some("late failure"));
}

// No request id guards against stale replies: whatever arrives last wins,
// even if it was issued first.
#[test]
fn responses_are_applied_in_arrival_order_without_staleness_check() {
    let session = session_on_result(AdjustmentFailurePolicy::KeepLastDraft, "v1");
    let second_issued = success("v3", &[]);
    let first_issued = success("v2", &[]);

    let session = session
        .handle_adjustment_response(second_issued)
        .session
        .handle_adjustment_response(first_issued)
        .session;
    assert_eq!(session.draft(), Some("v2"));
}

#[test]
fn policy_parses_from_config_strings() {
    assert_eq!(
        "keep_last_draft".parse::<AdjustmentFailurePolicy>().expect("parse"),
        AdjustmentFailurePolicy::KeepLastDraft
    );
    assert_eq!(
        "Revert-To-Upload".parse::<AdjustmentFailurePolicy>().expect("parse"),
        AdjustmentFailurePolicy::RevertToUpload
    );
    assert!("sometimes".parse::<AdjustmentFailurePolicy>().is_err());
}
