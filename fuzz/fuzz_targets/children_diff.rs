#![no_main]

use dom_test_support::fixtures::{child_ids, live_list, virtual_list};
use libfuzzer_sys::fuzz_target;
use vdom::{ReplayHandler, diff_dom};

const MAX_ID: u8 = 32;

// First half of the input is the live list, second half the virtual one.
fn unique_ids(bytes: &[u8]) -> Vec<i32> {
    let mut seen = [false; MAX_ID as usize];
    let mut out = Vec::new();
    for &b in bytes {
        let id = b % MAX_ID;
        if !seen[id as usize] {
            seen[id as usize] = true;
            out.push(i32::from(id));
        }
    }
    out
}

fuzz_target!(|data: &[u8]| {
    let (old, new) = data.split_at(data.len() / 2);
    let (old, new) = (unique_ids(old), unique_ids(new));

    let (vdom, vul) = virtual_list(&new);
    let (mut host, ul, mut replay) = live_list(&old);
    diff_dom(ul, vul, &mut host, &vdom, &mut replay).expect("diff");
    assert_eq!(child_ids(&host, replay.mirror(), ul), new);

    host.take_ops();
    diff_dom(ul, vul, &mut host, &vdom, &mut replay).expect("second diff");
    assert_eq!(host.structural_ops(), 0);
});
