use ledger_core::{Block, Chain};
use serde::Serialize;

/// Display form of a whole chain.
#[derive(Serialize)]
struct ChainView<'a> {
    #[serde(rename = "ds_chain")]
    blocks: &'a [Block],
    #[serde(rename = "chainHash")]
    chain_hash: &'a str,
}

pub fn chain_json(chain: &Chain) -> serde_json::Result<String> {
    serde_json::to_string(&ChainView {
        blocks: chain.blocks(),
        chain_hash: chain.tip_hash(),
    })
}

pub fn block_json(block: &Block) -> serde_json::Result<String> {
    serde_json::to_string(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{ChainConfig, Difficulty};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ChainDocument {
        #[serde(rename = "ds_chain")]
        blocks: Vec<Block>,
        #[serde(rename = "chainHash")]
        chain_hash: String,
    }

    #[test]
    fn chain_json_shape() {
        let mut chain = Chain::with_genesis(&ChainConfig::default()).unwrap();
        chain.push_data("Alice pays Bob 10", Difficulty::new(1).unwrap()).unwrap();

        let json = chain_json(&chain).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chainHash"], chain.tip_hash());
        let blocks = value["ds_chain"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1]["data"], "Alice pays Bob 10");
        assert_eq!(blocks[1]["index"], 1);
        assert!(blocks[1]["nonce"].is_string());
        assert!(blocks[0]["timestamp"].is_string());
    }

    #[test]
    fn chain_json_reads_back() {
        let mut chain = Chain::with_genesis(&ChainConfig::default()).unwrap();
        chain.push_data("Bob pays Carol 5", Difficulty::new(2).unwrap()).unwrap();

        let doc: ChainDocument = serde_json::from_str(&chain_json(&chain).unwrap()).unwrap();
        assert_eq!(doc.blocks, chain.blocks());
        assert_eq!(doc.chain_hash, chain.tip_hash());
    }

    #[test]
    fn block_json_fields() {
        let chain = Chain::with_genesis(&ChainConfig::default()).unwrap();
        let json = block_json(chain.latest().unwrap()).unwrap();
        for field in ["index", "timestamp", "data", "previous_hash", "nonce", "difficulty"] {
            assert!(json.contains(&format!("\"{field}\"")), "missing {field} in {json}");
        }
    }
}
