use crate::models::node::Node;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Shape problems in an upstream response body.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Invalid API response")]
    InvalidNodeList,
    #[error("Invalid node response")]
    InvalidNode,
    #[error("failed to decode node: {0}")]
    Decode(#[from] serde_json::Error),
}

fn first_present<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> Option<&'a Value> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_null())
}

/// Extracts the node array from `data.nodes`, `result.nodes` or `nodes`, in that order.
pub fn unwrap_node_list(body: &Value) -> Result<Vec<Node>, EnvelopeError> {
    let nodes = first_present([
        body.get("data").and_then(|data| data.get("nodes")),
        body.get("result").and_then(|result| result.get("nodes")),
        body.get("nodes"),
    ])
    .ok_or(EnvelopeError::InvalidNodeList)?;

    if !nodes.is_array() {
        return Err(EnvelopeError::InvalidNodeList);
    }

    Ok(Vec::<Node>::deserialize(nodes)?)
}

/// Extracts a single node from `data`, `result` or the bare body, in that order.
pub fn unwrap_node(body: &Value) -> Result<Node, EnvelopeError> {
    let node = first_present([body.get("data"), body.get("result"), Some(body)])
        .ok_or(EnvelopeError::InvalidNode)?;

    if !node.is_object() {
        return Err(EnvelopeError::InvalidNode);
    }

    Ok(Node::deserialize(node)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_json(id: &str) -> Value {
        json!({ "_id": id, "nodeId": format!("{id}.base.eth"), "wallet": "0x1", "nodeStatus": "Active" })
    }

    #[test]
    fn test_unwrap_prefers_data_nodes() {
        let body = json!({
            "data": { "nodes": [node_json("a")] },
            "result": { "nodes": [node_json("b")] },
            "nodes": [node_json("c")]
        });
        let nodes = unwrap_node_list(&body).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "a");
    }

    #[test]
    fn test_unwrap_falls_back_to_result_then_bare() {
        let body = json!({ "result": { "nodes": [node_json("b")] } });
        assert_eq!(unwrap_node_list(&body).unwrap()[0].id, "b");

        let body = json!({ "nodes": [node_json("c"), node_json("d")] });
        let nodes = unwrap_node_list(&body).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].id, "d");
    }

    #[test]
    fn test_unwrap_empty_array_is_valid() {
        let body = json!({ "data": { "nodes": [] } });
        assert!(unwrap_node_list(&body).unwrap().is_empty());
    }

    #[test]
    fn test_unwrap_keeps_mistyped_node_among_valid_ones() {
        let body = json!({ "nodes": [
            node_json("a"),
            { "_id": "b", "nodeId": 42, "wallet": "0x2", "nodeStatus": "Active", "type": 2,
              "nodeMetrics": [1, 2] },
            node_json("c")
        ] });
        let nodes = unwrap_node_list(&body).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].node_id, "42");
        assert_eq!(nodes[1].node_type.as_deref(), Some("2"));
        assert!(nodes[1].node_metrics.is_none());
        assert_eq!(nodes[2].id, "c");
    }

    #[test]
    fn test_unwrap_rejects_other_shapes() {
        for body in [
            json!({}),
            json!({ "data": { "items": [] } }),
            json!({ "nodes": { "a": 1 } }),
            json!([node_json("a")]),
            json!("nodes"),
        ] {
            let err = unwrap_node_list(&body).unwrap_err();
            assert_eq!(err.to_string(), "Invalid API response");
        }
    }

    #[test]
    fn test_unwrap_single_node() {
        let wrapped = json!({ "data": node_json("x") });
        assert_eq!(unwrap_node(&wrapped).unwrap().id, "x");

        let result = json!({ "result": node_json("y") });
        assert_eq!(unwrap_node(&result).unwrap().id, "y");

        let bare = node_json("z");
        assert_eq!(unwrap_node(&bare).unwrap().id, "z");

        assert!(matches!(
            unwrap_node(&json!({ "data": "missing" })),
            Err(EnvelopeError::InvalidNode)
        ));
        assert!(matches!(
            unwrap_node(&json!(42)),
            Err(EnvelopeError::InvalidNode)
        ));
    }
}
