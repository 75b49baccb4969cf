//! Stands up a small in-process cluster of `Group`s wired together through
//! an in-process `PeerPicker`/`PeerGetter` pair (plain function calls, not
//! sockets) to exercise ring routing and singleflight dedup end-to-end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use distcache::{
    Getter, Group, GroupConfig, HashRing, PeerGetter, PeerPicker, PeerRequest, PeerResponse,
    RingConfig,
};
use rand::Rng;

#[derive(Parser, Debug)]
#[command(about = "Routes keys across a simulated in-process cache cluster")]
struct Args {
    /// Number of cluster nodes to simulate.
    #[arg(long, default_value_t = 4)]
    nodes: usize,

    /// Distinct keys issued by clients.
    #[arg(long, default_value_t = 20)]
    keys: usize,

    /// Concurrent client requests issued per key.
    #[arg(long, default_value_t = 5)]
    clients_per_key: usize,

    /// Virtual nodes placed per ring member.
    #[arg(long, default_value_t = 50)]
    replicas: usize,

    /// Per-group local cache byte budget (0 = unbounded).
    #[arg(long, default_value_t = 0)]
    cache_bytes: u64,
}

/// Stands in for a slow, shared upstream data source hit by every node on a
/// true miss; counts invocations so the demo can show dedup working.
struct UpstreamSource {
    loads: Arc<AtomicU64>,
}

impl Getter for UpstreamSource {
    fn get(&self, key: &str) -> distcache::Result<Vec<u8>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(format!("value-of-{key}").into_bytes())
    }
}

/// Calls another node's `Group::get` directly, standing in for a network hop.
struct InProcessPeer {
    group: Arc<Group>,
}

impl PeerGetter for InProcessPeer {
    fn get(&self, request: &PeerRequest) -> distcache::Result<PeerResponse> {
        let value = self.group.get(&request.key)?;
        Ok(PeerResponse { value: value.to_vec() })
    }
}

/// Routes a key to the node that owns it via a shared [`HashRing`]; returns
/// `None` (meaning "load locally") when this node owns the key itself.
struct ClusterPicker {
    ring: Arc<HashRing>,
    self_name: String,
    peers: HashMap<String, Arc<dyn PeerGetter>>,
}

impl PeerPicker for ClusterPicker {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let owner = self.ring.get(key)?;
        if owner == self.self_name {
            return None;
        }
        self.peers.get(owner).cloned()
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let upstream_loads = Arc::new(AtomicU64::new(0));
    let upstream: Arc<dyn Getter> = Arc::new(UpstreamSource {
        loads: Arc::clone(&upstream_loads),
    });

    let node_names: Vec<String> = (0..args.nodes).map(|i| format!("node-{i}")).collect();
    let groups: Vec<Arc<Group>> = node_names
        .iter()
        .map(|name| {
            Group::new_detached(
                name.clone(),
                GroupConfig {
                    cache_bytes: args.cache_bytes,
                    cache_peer_results: false,
                },
                Arc::clone(&upstream),
            )
        })
        .collect();

    let mut ring = HashRing::from_config(RingConfig {
        replicas: args.replicas,
        hasher: None,
    });
    ring.add(node_names.iter());
    let ring = Arc::new(ring);

    for (i, name) in node_names.iter().enumerate() {
        let peers: HashMap<String, Arc<dyn PeerGetter>> = (0..args.nodes)
            .filter(|&j| j != i)
            .map(|j| {
                let peer: Arc<dyn PeerGetter> = Arc::new(InProcessPeer {
                    group: Arc::clone(&groups[j]),
                });
                (node_names[j].clone(), peer)
            })
            .collect();

        groups[i].register_peers(Arc::new(ClusterPicker {
            ring: Arc::clone(&ring),
            self_name: name.clone(),
            peers,
        }));
    }

    println!(
        "simulating {} nodes, {} keys, {} clients/key",
        args.nodes, args.keys, args.clients_per_key
    );

    let keys: Vec<String> = (0..args.keys).map(|i| format!("key-{i}")).collect();
    let handles: Vec<_> = keys
        .into_iter()
        .flat_map(|key| {
            let groups = groups.clone();
            (0..args.clients_per_key).map(move |_| {
                let key = key.clone();
                let groups = groups.clone();
                thread::spawn(move || {
                    let entry_node = rand::thread_rng().gen_range(0..groups.len());
                    groups[entry_node].get(&key).unwrap();
                })
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    println!(
        "upstream loads: {} (expect roughly one per distinct key, regardless of how many clients or nodes asked)",
        upstream_loads.load(Ordering::SeqCst)
    );

    for (name, group) in node_names.iter().zip(groups.iter()) {
        let metrics = group.metrics();
        println!(
            "{name}: hits={} misses={} local_loads={} peer_loads={}",
            metrics.hits(),
            metrics.misses(),
            metrics.local_loads(),
            metrics.peer_loads()
        );
    }
}
