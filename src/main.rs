use woweb::edit::Edit;
use woweb::sim::Cluster;

const LOCAL: &str = "local";
const EXTERNAL: &str = "external";

fn print_document(cluster: &Cluster, step: &str) -> woweb::Result<()> {
    let manager = cluster.manager(LOCAL)?;
    log::info!(
        "{}: clock {}, {} entries, {:?}",
        step,
        manager.timestamp(),
        manager.len(),
        manager.stats()
    );
    println!("# {}", step);
    println!("{}", manager.document());
    println!();
    return Ok(());
}

fn main() -> woweb::Result<()> {
    env_logger::init();

    let mut cluster = Cluster::new(&[LOCAL, EXTERNAL])?;

    // Local edits only. Node ids follow creation order.
    cluster.local(LOCAL, Edit::create("Local User 1"))?;
    cluster.local(LOCAL, Edit::create("Local User 2"))?;
    print_document(&cluster, "two local nodes")?;

    cluster.local(LOCAL, Edit::update(0, "Text of the first node."))?;
    cluster.local(LOCAL, Edit::update(1, "Text of the second node."))?;
    cluster.local(LOCAL, Edit::move_to(0, 1))?;
    print_document(&cluster, "updated and moved")?;
    cluster.deliver_all(EXTERNAL)?;

    // External edits made with everything local already seen.
    cluster.local(EXTERNAL, Edit::create("External User 1"))?;
    cluster.local(EXTERNAL, Edit::update(2, "Text of the first external node."))?;
    cluster.deliver_all(LOCAL)?;
    print_document(&cluster, "external node received")?;

    // Interleaved moves, each side in sync before the next edit.
    cluster.local(LOCAL, Edit::move_to(2, 0))?;
    cluster.deliver_all(EXTERNAL)?;
    cluster.local(EXTERNAL, Edit::move_to(2, 1))?;
    cluster.deliver_all(LOCAL)?;
    print_document(&cluster, "interleaved moves")?;

    // Conflict: the external participant moves node 2 before it has seen the
    // last local move. Its move sorts before that local move, so the local
    // move wins and node 2 ends up at position 0.
    cluster.local(LOCAL, Edit::move_to(2, 1))?;
    cluster.local(LOCAL, Edit::move_to(2, 0))?;
    cluster.deliver_next(EXTERNAL)?;
    cluster.local(EXTERNAL, Edit::move_to(2, 1))?;
    cluster.flush()?;
    print_document(&cluster, "delayed external move")?;

    if !cluster.converged() {
        log::warn!("participants diverged");
    }
    return Ok(());
}
