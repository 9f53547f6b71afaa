//! Clients and a server exchanging operations over in-memory queues.

use std::collections::VecDeque;

use ot_client::{Client, ClientState, Command, Revision, Server};
use ot_text::random::{random_operation, random_string};
use ot_text::{Cursor, TextOperation};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

enum Downstream {
    Ack,
    Operation(TextOperation),
}

struct Peer {
    client: Client,
    document: String,
    inbox: VecDeque<Downstream>,
}

type Upstream = VecDeque<(usize, Revision, TextOperation)>;

impl Peer {
    fn new(document: &str) -> Self {
        Self {
            client: Client::new(0),
            document: document.to_string(),
            inbox: VecDeque::new(),
        }
    }

    fn edit(&mut self, id: usize, operation: TextOperation, upstream: &mut Upstream) {
        self.document = operation.apply(&self.document).unwrap();
        if let Some(command) = self.client.apply_client(operation).unwrap() {
            self.run(id, command, upstream);
        }
    }

    fn receive(&mut self, id: usize, upstream: &mut Upstream) -> bool {
        let Some(message) = self.inbox.pop_front() else {
            return false;
        };
        let command = match message {
            Downstream::Ack => self.client.server_ack().unwrap(),
            Downstream::Operation(operation) => Some(self.client.apply_server(operation).unwrap()),
        };
        if let Some(command) = command {
            self.run(id, command, upstream);
        }
        true
    }

    fn run(&mut self, id: usize, command: Command, upstream: &mut Upstream) {
        match command {
            Command::Send {
                revision,
                operation,
            } => upstream.push_back((id, revision, operation)),
            Command::Apply(operation) => {
                self.document = operation.apply(&self.document).unwrap();
            }
        }
    }
}

fn deliver_upstream(server: &mut Server, peers: &mut [Peer], upstream: &mut Upstream) -> bool {
    let Some((sender, revision, operation)) = upstream.pop_front() else {
        return false;
    };
    let applied = server.receive_operation(revision, operation).unwrap();
    for (id, peer) in peers.iter_mut().enumerate() {
        peer.inbox.push_back(if id == sender {
            Downstream::Ack
        } else {
            Downstream::Operation(applied.clone())
        });
    }
    true
}

fn drain(server: &mut Server, peers: &mut [Peer], upstream: &mut Upstream) {
    loop {
        let mut progressed = deliver_upstream(server, peers, upstream);
        for (id, peer) in peers.iter_mut().enumerate() {
            while peer.receive(id, upstream) {
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// deterministic scenarios
// ---------------------------------------------------------------------------

#[test]
fn concurrent_insert_and_delete_converge() {
    let mut server = Server::new("ab");
    let mut peers = vec![Peer::new("ab"), Peer::new("ab")];
    let mut upstream = Upstream::new();
    peers[0].edit(0, TextOperation::new().insert("X").retain(2), &mut upstream);
    peers[1].edit(1, TextOperation::new().delete(1).retain(1), &mut upstream);
    drain(&mut server, &mut peers, &mut upstream);
    assert_eq!(server.document(), "Xb");
    for peer in &peers {
        assert_eq!(peer.document, "Xb");
        assert_eq!(peer.client.revision(), 2);
        assert_eq!(peer.client.state(), &ClientState::Synchronized);
    }
}

#[test]
fn one_operation_in_flight() {
    let mut server = Server::new("");
    let mut peers = vec![Peer::new("")];
    let mut upstream = Upstream::new();
    peers[0].edit(0, TextOperation::new().insert("a"), &mut upstream);
    peers[0].edit(0, TextOperation::new().retain(1).insert("b"), &mut upstream);
    peers[0].edit(0, TextOperation::new().retain(2).insert("c"), &mut upstream);
    assert_eq!(upstream.len(), 1);
    assert!(matches!(peers[0].client.state(), ClientState::AwaitingWithBuffer { .. }));

    assert!(deliver_upstream(&mut server, &mut peers, &mut upstream));
    assert!(peers[0].receive(0, &mut upstream));
    // The ack released the whole buffer as a single operation.
    assert_eq!(upstream.len(), 1);
    assert_eq!(upstream[0], (0, 1, TextOperation::new().retain(1).insert("bc")));

    drain(&mut server, &mut peers, &mut upstream);
    assert_eq!(server.document(), "abc");
    assert_eq!(server.revision(), 2);
}

#[test]
fn reconnect_resends_against_the_same_revision() {
    let mut server = Server::new("x");
    let mut client = Client::new(0);
    let edit = TextOperation::new().retain(1).insert("y");
    let Some(Command::Send {
        revision,
        operation,
    }) = client.apply_client(edit.clone()).unwrap()
    else {
        panic!("expected a send");
    };
    // the first send was lost
    assert_eq!(client.resend(), Some(Command::Send { revision, operation }));
    server.receive_operation(revision, edit).unwrap();
    assert_eq!(client.server_ack().unwrap(), None);
    assert_eq!(client.revision(), server.revision());
    assert_eq!(client.resend(), None);
}

#[test]
fn remote_cursor_lands_in_local_document() {
    // Server document "abc"; we have inserted "12345" locally, unacknowledged.
    let mut client = Client::new(0);
    client.apply_client(TextOperation::new().insert("12345").retain(3)).unwrap();
    assert_eq!(client.transform_cursor(Cursor::caret(2)), Cursor::caret(7));
    client.apply_client(TextOperation::new().retain(8).insert("!")).unwrap();
    assert_eq!(client.transform_cursor(Cursor::new(0, 3)), Cursor::new(5, 9));
}

// ---------------------------------------------------------------------------
// randomized convergence
// ---------------------------------------------------------------------------

fn simulate(seed: u64, peer_count: usize, steps: usize) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let initial = random_string(&mut rng, 10);
    let mut server = Server::new(initial.clone());
    let mut peers: Vec<Peer> = (0..peer_count).map(|_| Peer::new(&initial)).collect();
    let mut upstream = Upstream::new();

    for _ in 0..steps {
        let id = rng.gen_range(0..peer_count);
        match rng.gen_range(0..3) {
            0 => {
                let operation = random_operation(&mut rng, &peers[id].document, false);
                peers[id].edit(id, operation, &mut upstream);
            }
            1 => {
                deliver_upstream(&mut server, &mut peers, &mut upstream);
            }
            _ => {
                peers[id].receive(id, &mut upstream);
            }
        }
    }
    drain(&mut server, &mut peers, &mut upstream);

    for peer in &peers {
        assert_eq!(peer.document, server.document());
        assert_eq!(peer.client.revision(), server.revision());
        assert_eq!(peer.client.state(), &ClientState::Synchronized);
    }
}

#[test]
fn two_clients_converge() {
    for seed in 0..20 {
        simulate(seed, 2, 200);
    }
}

#[test]
fn many_clients_converge() {
    for seed in 100..110 {
        simulate(seed, 5, 400);
    }
}
