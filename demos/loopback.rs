//! Send a few notes and an MSC cue over a lossy loopback link.

use midi_relay::msc::{CommandFormat, MscCommand, MscComposer, PayloadMode};
use midi_relay::protocol::{decode_short_message, render_text};
use midi_relay::{ReceiveTable, ShortMessage, TransmitSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("midi-relay loopback");
    println!("===================\n");

    let mut tx = TransmitSession::default();
    let mut rx = ReceiveTable::default();

    let mut composer = MscComposer::new();
    composer.set_device_id(1);
    composer.set_command_format(CommandFormat::Lighting);
    composer.set_command(MscCommand::Go);
    composer.set_mode(PayloadMode::EosCue)?;
    composer.set_data("4/101.5")?;
    println!("MSC frame: {}", composer.frame_hex().unwrap_or_default());

    let packets = vec![
        tx.send(ShortMessage::note_on(60)),
        tx.send(ShortMessage::note_on(64)),
        tx.send(ShortMessage::note_on(67)),
        tx.send(composer.to_message()?),
        tx.send(ShortMessage::note_off(60)),
    ];

    for (idx, packet) in packets.iter().enumerate() {
        // Lose the second and third datagrams.
        if idx == 1 || idx == 2 {
            println!("packet {idx}: dropped");
            continue;
        }
        let delivered = rx.ingest(packet)?;
        println!("packet {idx}: {} new message(s)", delivered.len());
        for message in delivered {
            match decode_short_message(message.as_bytes()) {
                Ok(short) if message.len() == 3 => println!("  note {short:?}"),
                _ => println!("  {}", render_text(message.as_bytes())),
            }
        }
    }

    println!("\nstats: {:?}", rx.stats());
    Ok(())
}
