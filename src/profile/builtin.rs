use crate::rspec::{Request, TextFormat, Tour};

pub const TOUR_DESCRIPTION: &str = "\nExample profile for the hello-world-cluster\n";
pub const NODE_NAME: &str = "deploy-node";
pub const HARDWARE_TYPE: &str = "d430";
pub const DISK_IMAGE: &str = "urn:publicid:IDN+emulab.net+image+emulab-ops:UBUNTU22-64-STD";
pub const BLOCKSTORE_NAME: &str = "bs";
pub const BLOCKSTORE_MOUNT: &str = "/mydata";
pub const BLOCKSTORE_SIZE: &str = "20GB";

/// The default profile: one d430 with a public control IP and a 20GB
/// local volume at /mydata.
pub fn hello_world_cluster() -> Request {
    let mut request = Request::new();

    let mut tour = Tour::new();
    tour.description(TextFormat::Text, TOUR_DESCRIPTION);
    request.add_tour(tour);

    let node = request.raw_pc(NODE_NAME);
    node.hardware_type = Some(HARDWARE_TYPE.to_owned());
    node.disk_image = Some(DISK_IMAGE.to_owned());
    node.routable_control_ip = true;

    let bs = node.blockstore(BLOCKSTORE_NAME, BLOCKSTORE_MOUNT);
    bs.size = Some(BLOCKSTORE_SIZE.to_owned());

    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rspec::{render, NodeKind, Placement};

    #[test]
    fn builds_one_node_with_one_volume() {
        let request = hello_world_cluster();

        assert_eq!(request.nodes().len(), 1);
        let node = &request.nodes()[0];
        assert_eq!(node.name, "deploy-node");
        assert_eq!(node.kind, NodeKind::RawPc);
        assert_eq!(node.hardware_type.as_deref(), Some("d430"));
        assert_eq!(node.disk_image.as_deref(), Some(DISK_IMAGE));
        assert!(node.routable_control_ip);

        assert_eq!(node.blockstores().len(), 1);
        let bs = &node.blockstores()[0];
        assert_eq!(bs.name, "bs");
        assert_eq!(bs.mount, "/mydata");
        assert_eq!(bs.size.as_deref(), Some("20GB"));
        assert_eq!(bs.placement, Placement::Any);

        let tour = request.tour().unwrap();
        assert_eq!(
            tour.description,
            Some((TextFormat::Text, TOUR_DESCRIPTION.to_owned()))
        );
        assert_eq!(tour.instructions, None);
    }

    #[test]
    fn renders_expected_document() {
        let xml = render(&hello_world_cluster()).unwrap();

        let expected = "\
<?xml version='1.0' encoding='UTF-8'?>
<rspec xmlns=\"http://www.geni.net/resources/rspec/3\" \
xmlns:emulab=\"http://www.protogeni.net/resources/rspec/ext/emulab/1\" \
xmlns:tour=\"http://www.protogeni.net/resources/rspec/ext/apt-tour/1\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
xsi:schemaLocation=\"http://www.geni.net/resources/rspec/3 http://www.geni.net/resources/rspec/3/request.xsd\" \
type=\"request\">
  <rspec_tour xmlns=\"http://www.protogeni.net/resources/rspec/ext/apt-tour/1\">
    <description type=\"text\">
Example profile for the hello-world-cluster
</description>
  </rspec_tour>
  <node client_id=\"deploy-node\" exclusive=\"true\">
    <sliver_type name=\"raw-pc\">
      <disk_image name=\"urn:publicid:IDN+emulab.net+image+emulab-ops:UBUNTU22-64-STD\"/>
    </sliver_type>
    <hardware_type name=\"d430\"/>
    <emulab:routable_control_ip/>
    <emulab:blockstore name=\"bs\" mountpoint=\"/mydata\" class=\"local\" size=\"20GB\" placement=\"any\"/>
  </node>
</rspec>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render(&hello_world_cluster()).unwrap();
        let second = render(&hello_world_cluster()).unwrap();
        assert_eq!(first, second);
    }
}
