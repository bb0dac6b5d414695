// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn grants_until_capacity_then_queues() {
    let mut queue = AdmissionQueue::new(2);

    assert_eq!(queue.request("a").1, Admission::Granted);
    assert_eq!(queue.request("b").1, Admission::Granted);
    assert_eq!(queue.request("c").1, Admission::Queued { position: 0 });
    assert_eq!(queue.request("d").1, Admission::Queued { position: 1 });

    assert_eq!(queue.in_use(), 2);
    assert_eq!(queue.waiting(), 2);
}

#[test]
fn release_hands_slot_to_queue_head() {
    let mut queue = AdmissionQueue::new(1);
    queue.request("a");
    let (waiting_id, _) = queue.request("b");

    let next = queue.release();

    assert_eq!(next.map(|t| t.id), Some(waiting_id));
    assert_eq!(queue.in_use(), 1);
    assert_eq!(queue.waiting(), 0);
}

#[test]
fn release_with_empty_queue_frees_slot() {
    let mut queue = AdmissionQueue::new(1);
    queue.request("a");

    assert!(queue.release().is_none());
    assert_eq!(queue.in_use(), 0);
    assert_eq!(queue.request("b").1, Admission::Granted);
}

#[test]
fn new_request_queues_behind_waiters_even_with_free_slot() {
    let mut queue = AdmissionQueue::new(2);
    queue.request("a");
    queue.request("b");
    queue.request("c");
    queue.request("d");

    // One holder leaves with the queue non-empty: its slot goes to "c".
    let handed = queue.release();
    assert_eq!(handed.map(|t| t.holder), Some("c".to_string()));

    let (_, admission) = queue.request("e");
    assert_eq!(admission, Admission::Queued { position: 1 });
    assert_eq!(queue.queued_holders().collect::<Vec<_>>(), vec!["d", "e"]);
}

#[test]
fn cancel_removes_only_queued_ticket() {
    let mut queue = AdmissionQueue::new(1);
    let (granted, _) = queue.request("a");
    let (queued, _) = queue.request("b");

    assert!(!queue.cancel(granted));
    assert!(queue.cancel(queued));
    assert_eq!(queue.waiting(), 0);
    assert!(!queue.cancel(queued));
}

#[test]
fn zero_capacity_is_clamped_to_one() {
    let mut queue = AdmissionQueue::new(0);
    assert_eq!(queue.capacity(), 1);
    assert_eq!(queue.request("a").1, Admission::Granted);
}

#[test]
fn n_plus_five_requests_are_admitted_in_order_without_exceeding_capacity() {
    let capacity = 3;
    let mut queue = AdmissionQueue::new(capacity);
    let mut order = Vec::new();
    let mut holders = std::collections::VecDeque::new();

    for i in 0..capacity + 5 {
        let name = format!("store-{}", i);
        if queue.request(name.clone()).1 == Admission::Granted {
            order.push(name.clone());
            holders.push_back(name);
        }
    }
    assert_eq!(order.len(), capacity);

    while holders.pop_front().is_some() {
        if let Some(ticket) = queue.release() {
            order.push(ticket.holder.clone());
            holders.push_back(ticket.holder);
        }
        assert!(queue.in_use() <= capacity);
    }

    let expected: Vec<String> = (0..capacity + 5).map(|i| format!("store-{}", i)).collect();
    assert_eq!(order, expected);
    assert_eq!(queue.in_use(), 0);
}
