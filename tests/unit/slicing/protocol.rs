use super::*;

#[tokio::test]
async fn delivers_by_name_and_deregisters() {
    let broker = SliceBroker::new();
    let mut ticket = broker.register("hero");
    assert!(broker.is_pending("hero"));

    assert!(broker.deliver(SliceResponse::ok("hero", vec![])));
    let resp = ticket.response().await.unwrap();
    assert!(resp.success);
    assert_eq!(broker.pending_count(), 0);
}

#[tokio::test]
async fn unmatched_responses_are_ignored() {
    let broker = SliceBroker::new();
    let _ticket = broker.register("hero");
    assert!(!broker.deliver(SliceResponse::ok("other", vec![])));
    assert!(broker.is_pending("hero"));
}

#[test]
fn dropping_a_ticket_deregisters_it() {
    let broker = SliceBroker::new();
    let ticket = broker.register("hero");
    assert_eq!(broker.pending_count(), 1);
    drop(ticket);
    assert_eq!(broker.pending_count(), 0);
    assert!(!broker.deliver(SliceResponse::ok("hero", vec![])));
}

#[tokio::test]
async fn newer_registration_supersedes_older() {
    let broker = SliceBroker::new();
    let mut old = broker.register("hero");
    let mut new = broker.register("hero");
    assert!(old.response().await.is_err());

    // Dropping the superseded ticket must not remove the newer registration.
    drop(old);
    assert!(broker.is_pending("hero"));

    assert!(broker.deliver(SliceResponse::failed("hero", "decode error")));
    let resp = new.response().await.unwrap();
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("decode error"));
}

#[test]
fn request_keys_are_unique_per_asset() {
    let broker = SliceBroker::new();
    let a = broker.request_key("image");
    let b = broker.request_key("image");
    assert_ne!(a, b);
    assert!(a.starts_with("image#") && b.starts_with("image#"));
}

#[test]
fn response_json_shape() {
    let json = r#"{"name":"hero","success":true,"slices":[{"x":0,"y":0,"width":2,"height":1,"bytes":[1,2]}]}"#;
    let resp: SliceResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.slices.as_ref().unwrap()[0].width, 2);
    assert!(resp.error.is_none());

    let v = serde_json::to_value(SliceResponse::failed("a", "b")).unwrap();
    assert!(v.get("slices").is_none());
    assert_eq!(v["error"], "b");
}

#[tokio::test]
async fn channel_rasterizer_forwards_requests() {
    let (rasterizer, mut rx) = ChannelRasterizer::new();
    let strategy = crate::slicing::planner::compute_slice_strategy(5000, 10, 4096);
    rasterizer.submit(
        SliceRequest {
            bytes: Arc::new(vec![1]),
            width: 5000,
            height: 10,
            name: "hero".to_string(),
            tile_width: strategy.tile_width,
            tile_height: strategy.tile_height,
            strategy,
        },
        CancellationToken::new(),
    );
    let (req, cancel) = rx.recv().await.unwrap();
    assert_eq!(req.name, "hero");
    assert_eq!(req.tile_width, 3686);
    assert!(!cancel.is_cancelled());
}
