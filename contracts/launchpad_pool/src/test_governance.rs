use crate::{Address, EngineParams, Error, LaunchpadPool};

const NOW: u64 = 1_700_000_000;

fn setup_with_proposal() -> (LaunchpadPool, u64) {
    let mut engine = LaunchpadPool::new(EngineParams::default());
    let id = engine
        .create_proposal(
            NOW,
            &Address::from("owner"),
            "Test Proposal",
            "Description of the proposal",
        )
        .value;
    (engine, id)
}

#[test]
fn test_vote_is_recorded() {
    let (mut engine, id) = setup_with_proposal();
    let voter = Address::from("investor1");

    engine.vote(NOW, &voter, id, true).unwrap();

    assert!(engine.get_vote(id, &voter).unwrap());
}

#[test]
fn test_no_vote_is_distinct_from_never_voted() {
    let (mut engine, id) = setup_with_proposal();
    let against = Address::from("against");

    engine.vote(NOW, &against, id, false).unwrap();

    assert!(!engine.get_vote(id, &against).unwrap());
    assert_eq!(
        engine.get_vote(id, &Address::from("silent")).unwrap_err(),
        Error::VoteNotFound
    );
}

#[test]
fn test_duplicate_vote_keeps_first_choice() {
    let (mut engine, id) = setup_with_proposal();
    let voter = Address::from("investor1");
    engine.vote(NOW, &voter, id, true).unwrap();

    let err = engine.vote(NOW + 10, &voter, id, false).unwrap_err();

    assert_eq!(err, Error::DuplicateVote);
    assert!(engine.get_vote(id, &voter).unwrap());
    let proposal = engine.get_proposal(id).unwrap();
    assert_eq!((proposal.yes_votes, proposal.no_votes), (1, 0));
    assert_eq!(proposal.votes[&voter].cast_at, NOW);
}

#[test]
fn test_vote_on_unknown_proposal() {
    let (mut engine, _) = setup_with_proposal();
    let voter = Address::from("investor1");

    assert_eq!(
        engine.vote(NOW, &voter, 42, true).unwrap_err(),
        Error::ProposalNotFound
    );
    assert_eq!(
        engine.get_vote(42, &voter).unwrap_err(),
        Error::ProposalNotFound
    );
}

#[test]
fn test_same_voter_across_proposals() {
    let (mut engine, first) = setup_with_proposal();
    let second = engine
        .create_proposal(NOW, &Address::from("owner"), "Second", "")
        .value;
    let voter = Address::from("investor1");

    engine.vote(NOW, &voter, first, true).unwrap();
    engine.vote(NOW, &voter, second, false).unwrap();

    assert!(engine.get_vote(first, &voter).unwrap());
    assert!(!engine.get_vote(second, &voter).unwrap());
}

#[test]
fn test_proposal_tally_and_metadata() {
    let (mut engine, id) = setup_with_proposal();
    for (name, support) in [("a", true), ("b", true), ("c", false)] {
        engine.vote(NOW, &Address::from(name), id, support).unwrap();
    }

    let proposal = engine.get_proposal(id).unwrap();
    assert_eq!(proposal.title, "Test Proposal");
    assert_eq!(proposal.description, "Description of the proposal");
    assert_eq!(proposal.proposer, Address::from("owner"));
    assert_eq!(proposal.created_at, NOW);
    assert_eq!(proposal.yes_votes, 2);
    assert_eq!(proposal.no_votes, 1);
    assert_eq!(proposal.total_votes(), 3);
    assert_eq!(proposal.votes.len(), 3);
}

#[test]
fn test_proposal_ids_are_sequential() {
    let (mut engine, first) = setup_with_proposal();
    let second = engine
        .create_proposal(NOW, &Address::from("someone"), "Another", "")
        .value;

    assert_eq!((first, second), (0, 1));
    assert_eq!(engine.proposal_count(), 2);
    assert_eq!(engine.get_proposal(2).unwrap_err(), Error::ProposalNotFound);
}
