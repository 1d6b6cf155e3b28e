use super::types::{Document, Layer, LayerNode};

impl Document {
    /// Innermost layers in depth-first document order.
    ///
    /// A layer that contains sublayers is not exported itself, only its
    /// leaves are. A document without any layers exports its root element.
    pub fn leaf_layers(&self) -> Vec<Layer> {
        let mut leaves = Vec::new();

        if self.layers.is_empty() {
            if let Some(id) = &self.id {
                leaves.push(make_layer(id, self.label.as_deref(), 0));
            }
            return leaves;
        }

        for node in &self.layers {
            collect_leaves(node, &mut leaves);
        }
        leaves
    }
}

fn collect_leaves(node: &LayerNode, leaves: &mut Vec<Layer>) {
    if node.sublayers.is_empty() {
        let index = leaves.len();
        leaves.push(make_layer(&node.id, node.label.as_deref(), index));
        return;
    }

    for sublayer in &node.sublayers {
        collect_leaves(sublayer, leaves);
    }
}

fn make_layer(id: &str, label: Option<&str>, index: usize) -> Layer {
    Layer {
        id: id.to_string(),
        label: label.unwrap_or(id).to_string(),
        index,
    }
}
