//! Network command handlers.

use rsctl_core::{Controller, NetworkDelta, NetworkSettings};

use crate::cli::{GlobalOpts, NetworkArgs, NetworkCommand, NetworkSetArgs};
use crate::error::CliError;
use crate::output::{self, Detail};
use crate::progress;

use super::util;

fn settings_detail(s: &NetworkSettings) -> String {
    let iface = &s.interface;
    let proto = &s.protocol;

    let mut detail = Detail::new()
        .field("Hostname", iface.host_name.as_deref())
        .field("MAC address", iface.mac_address.as_deref())
        .field("DHCP enabled", Some(iface.dhcp_enabled()))
        .section("IP addresses");
    for ip in &iface.ipv4_addresses {
        detail = detail
            .field("Address", ip.address.as_deref())
            .field("Subnet mask", ip.subnet_mask.as_deref())
            .field("Gateway", ip.gateway.as_deref())
            .field("Origin", ip.address_origin.as_deref());
    }

    let proxy = proto.proxy.as_ref();
    detail
        .end_section()
        .section("Name servers")
        .items(&iface.name_servers)
        .end_section()
        .section("mDNS discovery protocol")
        .field("Enabled", proto.mdns_enabled())
        .end_section()
        .section("Proxy settings")
        .field("Enabled", Some(proto.proxy_enabled()))
        .field("Proxy server URI", proto.proxy_uri())
        .section("Exclude addresses")
        .items(
            proxy
                .and_then(|p| p.exclude_addresses.as_deref())
                .unwrap_or_default(),
        )
        .build()
}

impl From<NetworkSetArgs> for NetworkDelta {
    fn from(args: NetworkSetArgs) -> Self {
        Self {
            dhcp: util::toggle(args.dhcp),
            static_address: args.static_address,
            subnet_mask: args.subnet_mask,
            gateway: args.gateway,
            name_servers: args.name_servers,
            use_dhcp_dns: util::toggle(args.use_dhcp_dns),
            proxy: util::toggle(args.proxy),
            proxy_server: args.proxy_server,
            proxy_exclude: args.proxy_exclude,
            mdns: util::toggle(args.mdns),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: NetworkArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NetworkCommand::Get => {
            let settings = controller.network_settings().await?;
            let out = output::render_single(global.output, &settings, settings_detail, |s| {
                s.interface
                    .ipv4_addresses
                    .iter()
                    .filter_map(|ip| ip.address.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworkCommand::Set(set) => {
            let delta = NetworkDelta::from(set);
            let mut sink = progress::sink(global.quiet);
            let plan = controller.update_network(&delta, &mut *sink).await?;
            if plan.is_empty() {
                output::print_status("Nothing to change", global.quiet);
            } else {
                output::print_status("Network settings updated", global.quiet);
            }
            Ok(())
        }
    }
}
