use conversation_store::{ConversationStore, Role, StoreError};
use tempfile::TempDir;

fn open_store() -> (TempDir, ConversationStore) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = ConversationStore::open_at(dir.path()).expect("store should open");
    (dir, store)
}

#[test]
fn open_creates_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let root = dir.path().join("nested").join("data");

    let store = ConversationStore::open_at(&root).expect("store should create directory");
    assert!(store.path().exists());
}

#[test]
fn conversation_round_trip_preserves_order_and_roles() {
    let (_dir, mut store) = open_store();

    let id = store
        .append_message(None, Role::User, "what is 2 + 2?", false)
        .expect("user turn should append");
    store
        .append_message(Some(&id), Role::Assistant, "4", false)
        .expect("assistant turn should append");

    let messages = store
        .conversation_messages(&id)
        .expect("messages should read back");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "what is 2 + 2?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "4");
    assert!(messages.iter().all(|m| m.conversation_id == id));
}

#[test]
fn current_pointer_is_absent_before_any_append() {
    let (_dir, store) = open_store();

    assert_eq!(
        store
            .current_conversation_id()
            .expect("pointer read should succeed"),
        None
    );
}

#[test]
fn current_pointer_tracks_most_recent_conversation() {
    let (_dir, mut store) = open_store();

    let first = store
        .append_message(None, Role::User, "first", true)
        .expect("first conversation should append");
    let second = store
        .append_message(None, Role::User, "second", true)
        .expect("second conversation should append");

    assert_ne!(first, second);
    assert_eq!(
        store
            .current_conversation_id()
            .expect("pointer read should succeed"),
        Some(second)
    );
}

#[test]
fn append_without_id_reuses_nothing_and_creates_conversation() {
    let (_dir, mut store) = open_store();

    let first = store
        .append_message(None, Role::User, "a", false)
        .expect("append should create a conversation");
    let second = store
        .append_message(None, Role::User, "b", false)
        .expect("append should create another conversation");

    assert_ne!(first, second);
}

#[test]
fn append_to_unknown_conversation_is_rejected() {
    let (_dir, mut store) = open_store();

    let error = store
        .append_message(Some("no-such-id"), Role::User, "hello", false)
        .expect_err("unknown id must fail");
    assert!(matches!(error, StoreError::UnknownConversation(id) if id == "no-such-id"));
}

#[test]
fn list_conversations_orders_by_most_recent_update() {
    let (_dir, mut store) = open_store();

    let first = store
        .append_message(None, Role::User, "one", true)
        .expect("first conversation should append");
    let second = store
        .append_message(None, Role::User, "two", true)
        .expect("second conversation should append");
    store
        .append_message(Some(&first), Role::Assistant, "reply", false)
        .expect("append to first should bump updated_at");

    let summaries = store
        .list_conversations()
        .expect("listing should succeed");
    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();

    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[test]
fn appending_to_existing_conversation_moves_pointer_back() {
    let (_dir, mut store) = open_store();

    let first = store
        .append_message(None, Role::User, "one", true)
        .expect("first conversation should append");
    store
        .append_message(None, Role::User, "two", true)
        .expect("second conversation should append");
    store
        .append_message(Some(&first), Role::User, "again", false)
        .expect("append to first should succeed");

    assert_eq!(
        store
            .current_conversation_id()
            .expect("pointer read should succeed"),
        Some(first)
    );
}

#[test]
fn system_user_assistant_turns_read_back_chronologically() {
    let (_dir, mut store) = open_store();

    let id = store
        .create_conversation()
        .expect("conversation should be created");
    store
        .append_message(Some(&id), Role::System, "be helpful", false)
        .expect("system turn should append");
    store
        .append_message(Some(&id), Role::User, "hi", false)
        .expect("user turn should append");
    store
        .append_message(Some(&id), Role::Assistant, "hello", false)
        .expect("assistant turn should append");

    let roles: Vec<Role> = store
        .conversation_messages(&id)
        .expect("messages should read back")
        .into_iter()
        .map(|m| m.role)
        .collect();

    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
}
