use super::cell::ResponseCell;
use super::{EffectiveSequence, Next, ReadyHandler, Set};
use crate::response::Reply;
use crate::route::{Handler, SharedRequest};
use crate::types::RouteParams;
use bytes::Bytes;
use hyper::Request;
use std::pin::Pin;
use std::sync::Arc;

/// Composes a route handler with its middleware sequence into a single callable.
pub(crate) struct HandlerPipeline;

impl HandlerPipeline {
    /// With an empty sequence the composed handler only injects `groups` and calls the handler.
    pub(crate) fn build(handler: Handler, sequence: EffectiveSequence, groups: Option<RouteParams>) -> ReadyHandler {
        Arc::new(move |mut req: Request<Bytes>| {
            let handler = handler.clone();
            let sequence = sequence.clone();
            let groups = groups.clone();

            Box::new(async move {
                if let Some(groups) = groups {
                    req.extensions_mut().insert(groups);
                }
                let req = Arc::new(req);

                if sequence.is_empty() {
                    return Ok(Pin::from(handler(req)).await);
                }

                run(handler, sequence, req).await
            })
        })
    }
}

// Both flows share one task. The result is whatever the slot holds once both have finished.
async fn run(handler: Handler, sequence: EffectiveSequence, req: SharedRequest) -> crate::Result<Reply> {
    let cell = Arc::new(ResponseCell::new());

    let handler_flow = {
        let cell = cell.clone();
        let req = req.clone();
        async move {
            let reply = Pin::from(handler(req)).await;
            cell.fill(reply);
        }
    };

    let steps = {
        let cell = cell.clone();
        async move {
            for entry in sequence.iter() {
                let next = Next::new(cell.clone());
                let set = Set::new(cell.clone());
                entry.middleware.process(req.clone(), next, set).await?;
            }
            Ok::<_, crate::Error>(())
        }
    };

    let ((), done) = tokio::join!(handler_flow, steps);
    done?;

    Ok(cell.take())
}
