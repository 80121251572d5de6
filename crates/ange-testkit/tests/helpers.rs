use ange_testkit::{temp_dir_in_workspace, wait_for_content, wait_for_file, write_file};
use std::time::Duration;

#[test]
fn test_temp_dir_lives_under_dot_tmp() {
    let temp = temp_dir_in_workspace();
    let parent = temp.path().parent().unwrap();
    assert_eq!(parent.file_name().unwrap(), ".tmp");
}

#[test]
fn test_write_file_creates_parents() {
    let temp = temp_dir_in_workspace();
    let path = write_file(temp.path(), "a/b/c.ange", "hello");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
}

#[tokio::test]
async fn test_wait_for_file_times_out() {
    let temp = temp_dir_in_workspace();
    let missing = temp.path().join("never");
    assert!(wait_for_file(&missing, Duration::from_millis(100)).await.is_none());
}

#[tokio::test]
async fn test_wait_for_content_accepts() {
    let temp = temp_dir_in_workspace();
    let path = write_file(temp.path(), "out.txt", "ready");
    let content = wait_for_content(&path, Duration::from_secs(1), |c| c == "ready").await;
    assert_eq!(content.as_deref(), Some("ready"));
}
