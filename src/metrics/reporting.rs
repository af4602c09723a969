//! Final report rendering

use crate::metrics::aggregate::AggregateReport;

impl AggregateReport {
    /// Print the run's final report to the console
    pub fn print_report(&self) {
        println!("\n📊 Flood Test Results");
        println!("═══════════════════════════════════════════════════════════════");
        println!("   Time elapsed:         {:.2}s", self.elapsed.as_secs_f64());
        println!(
            "   Connections:          {}/{}",
            self.connected_count, self.total_clients
        );
        println!("   Connection failures:  {}", self.failed_connect_count);
        println!("   Messages sent:        {}", self.messages_sent_total);
        println!("   Messages received:    {}", self.messages_received_total);
        println!("   Errors:               {}", self.errors_total);
        println!("   Throughput:           {:.2} msg/sec", self.throughput());
        println!("   Success rate:         {:.2}%", self.success_rate());

        // More confirmed responses than sends means the target produced
        // unsolicited traffic the profiles counted; worth surfacing.
        if self.messages_received_total > self.messages_sent_total {
            println!(
                "   ⚠️  Anomaly: received ({}) exceeds sent ({})",
                self.messages_received_total, self.messages_sent_total
            );
        }

        println!("═══════════════════════════════════════════════════════════════");
    }
}
