//! DOM node handle & query surface: a handle wraps a node id plus the
//! connection that owns it, and is threaded through the describe/resolve/
//! request pipeline used to cross DOM boundaries (e.g. into an iframe).

use crate::cdp_types::{
    DescribeNodeParams, MoveToParams, QuerySelectorAllParams, QuerySelectorParams, RemoteObject,
    RequestNodeParams, ResolveNodeParams, SetNodeNameParams, SetOuterHtmlParams,
};
use crate::connection::Connection;
use crate::error::{CdpError, Result};
use crate::ids::{BackendNodeId, FrameId, NodeId, RemoteObjectId};

/// Whether a "Could not find node with given id" error on the *root* node
/// of a query is swallowed or raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRootPolicy {
    Ignore,
    Raise,
}

/// A handle to one DOM node plus the connection that owns it. Mutation
/// methods invalidate `node_id`; using a handle afterwards surfaces
/// `CdpError::NodeNotFound` the same way a stale id would from the browser
/// itself.
#[derive(Debug, Clone)]
pub struct NodeHandle<'a> {
    conn: &'a Connection,
    node_id: NodeId,
    selector: Option<String>,
    backend_node_id: Option<BackendNodeId>,
    frame_id: Option<FrameId>,
    remote_object_id: Option<RemoteObjectId>,
}

impl<'a> NodeHandle<'a> {
    pub fn new(conn: &'a Connection, node_id: NodeId) -> Self {
        Self {
            conn,
            node_id,
            selector: None,
            backend_node_id: None,
            frame_id: None,
            remote_object_id: None,
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// `DOM.querySelector` from this node's root.
    pub async fn query_selector(
        &self,
        selector: &str,
        on_missing_root: MissingRootPolicy,
    ) -> Result<Option<NodeHandle<'a>>> {
        let result = self
            .conn
            .call(QuerySelectorParams {
                node_id: self.node_id,
                selector: selector.to_string(),
            })
            .await;

        match result {
            Ok(r) => {
                let mut handle = NodeHandle::new(self.conn, r.node_id);
                handle.selector = Some(selector.to_string());
                Ok(Some(handle))
            }
            Err(CdpError::NodeNotFound) => match on_missing_root {
                MissingRootPolicy::Ignore => Ok(None),
                MissingRootPolicy::Raise => Err(CdpError::RootNodeGone),
            },
            Err(other) => Err(other),
        }
    }

    /// `DOM.querySelectorAll` from this node's root.
    pub async fn query_selector_all(
        &self,
        selector: &str,
        on_missing_root: MissingRootPolicy,
    ) -> Result<Vec<NodeHandle<'a>>> {
        let result = self
            .conn
            .call(QuerySelectorAllParams {
                node_id: self.node_id,
                selector: selector.to_string(),
            })
            .await;

        match result {
            Ok(r) => Ok(r
                .node_ids
                .into_iter()
                .map(|id| {
                    let mut h = NodeHandle::new(self.conn, id);
                    h.selector = Some(selector.to_string());
                    h
                })
                .collect()),
            Err(CdpError::NodeNotFound) => match on_missing_root {
                MissingRootPolicy::Ignore => Ok(Vec::new()),
                MissingRootPolicy::Raise => Err(CdpError::RootNodeGone),
            },
            Err(other) => Err(other),
        }
    }

    /// Fetches node metadata, including `backendNodeId` and `frameId` on
    /// frame owners.
    pub async fn describe(&mut self, depth: i32) -> Result<()> {
        let result = self
            .conn
            .call(DescribeNodeParams {
                node_id: self.node_id,
                depth,
            })
            .await?;
        self.backend_node_id = Some(result.node.backend_node_id);
        self.frame_id = result.node.frame_id;
        Ok(())
    }

    /// Obtains a `RemoteObject` reference to this node's JS wrapper;
    /// requires a prior `describe`.
    pub async fn resolve(&mut self) -> Result<RemoteObject> {
        let backend_node_id = self
            .backend_node_id
            .clone()
            .ok_or(CdpError::InvalidState("resolve requires a prior describe"))?;
        let result = self
            .conn
            .call(ResolveNodeParams { backend_node_id })
            .await?;
        self.remote_object_id = result.object.object_id.clone();
        Ok(result.object)
    }

    /// Inverse of `resolve`: given a remote object, retrieve the `node_id`
    /// in the caller's DOM tree.
    pub async fn request(&self, object_id: RemoteObjectId) -> Result<NodeHandle<'a>> {
        let result = self.conn.call(RequestNodeParams { object_id }).await?;
        Ok(NodeHandle::new(self.conn, result.node_id))
    }

    /// Composite describe+resolve+request used to cross DOM boundaries,
    /// e.g. reaching into an `<iframe>`.
    pub async fn request_mirror<'b>(&mut self, into: &'b Connection) -> Result<NodeHandle<'b>> {
        self.describe(0).await?;
        let object = self.resolve().await?;
        let object_id = object
            .object_id
            .ok_or(CdpError::InvalidState("node has no resolvable remote object"))?;
        let result = into.call(RequestNodeParams { object_id }).await?;
        Ok(NodeHandle::new(into, result.node_id))
    }

    /// Invalidates this handle's `node_id`.
    pub async fn set_outer_html(mut self, html: impl Into<String>) -> Result<()> {
        self.conn
            .call(SetOuterHtmlParams {
                node_id: self.node_id,
                outer_html: html.into(),
            })
            .await?;
        self.node_id = NodeId(-1);
        Ok(())
    }

    pub async fn set_node_name(mut self, name: impl Into<String>) -> Result<NodeHandle<'a>> {
        let result = self
            .conn
            .call(SetNodeNameParams {
                node_id: self.node_id,
                name: name.into(),
            })
            .await?;
        self.node_id = NodeId(-1);
        Ok(NodeHandle::new(self.conn, result.node_id))
    }

    pub async fn move_to(mut self, target: &NodeHandle<'a>) -> Result<NodeHandle<'a>> {
        let result = self
            .conn
            .call(MoveToParams {
                node_id: self.node_id,
                target_node_id: target.node_id,
            })
            .await?;
        self.node_id = NodeId(-1);
        Ok(NodeHandle::new(self.conn, result.node_id))
    }

    /// Constructs a script object bound to this node's frame's default
    /// execution context; requires Runtime-watch mode.
    pub async fn build_script(&self, expression: &str) -> Result<String> {
        let frame_id = self
            .frame_id
            .as_ref()
            .ok_or(CdpError::InvalidState("build_script requires a prior describe"))?;
        let ctx = self
            .conn
            .contexts()
            .default_for(frame_id)
            .await
            .ok_or(CdpError::UniqueContextIdNotFound)?;
        Ok(format!(
            "(function(){{ return {expression}; }}).call(undefined) /* uniqueContextId={} */",
            ctx.unique_id.0
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidated_node_id_is_sentinel() {
        assert_eq!(NodeId(-1).0, -1);
    }
}
