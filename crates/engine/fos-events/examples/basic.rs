//! Example: capture, target and bubble listeners on a three-node tree
//!
//! Run with `RUST_LOG=fos_events=trace` to see every dispatch step.

use std::rc::Rc;

use fos_events::{
    CallbackError, CallbackId, Event, EventSession, ListenerOptions, NodeId, ParentMap,
    ScriptFunction,
};
use tracing_subscriber::EnvFilter;

fn logger(id: u64, label: &'static str) -> Rc<ScriptFunction> {
    Rc::new(ScriptFunction::new(CallbackId(id), move |inv| {
        println!(
            "{:<8} currentTarget={} phase={}",
            label,
            inv.current_target(),
            inv.event_phase().as_u16()
        );
        Ok(())
    }))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tree = Rc::new(ParentMap::new());
    let (document, body, button) = (NodeId::ROOT, NodeId(1), NodeId(2));
    tree.set_parent(body, document);
    tree.set_parent(button, body);

    let session = EventSession::new(tree);
    session.add_event_listener(document, "click", logger(1, "capture"), true)?;
    session.add_event_listener(button, "click", logger(2, "target"), false)?;
    session.add_event_listener(body, "click", logger(3, "bubble"), false)?;
    session.add_event_listener(
        body,
        "click",
        Rc::new(ScriptFunction::new(CallbackId(4), |inv| {
            inv.prevent_default();
            Err(CallbackError::thrown("demo failure is reported, not fatal"))
        })),
        false,
    )?;

    if let Err(err) = session.add_event_listener(
        button,
        "click",
        logger(5, "once"),
        ListenerOptions { once: true, ..Default::default() },
    ) {
        println!("rejected: {err}");
    }

    let not_prevented = session.dispatch_event(button, &mut Event::bubbling("click"))?;
    println!("dispatchEvent returned {not_prevented}");

    session.teardown();
    Ok(())
}
